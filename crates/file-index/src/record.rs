//! Index entries.

use serde::{Deserialize, Serialize};

/// One index entry: the ordering key plus the file it points at.
///
/// Fields are read-only once constructed. A record's key decides its place
/// in the tree, so changing it in place would break the ordering.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyedRecord {
    key: String,
    name: String,
    path: String,
}

impl KeyedRecord {
    pub fn new(key: impl Into<String>, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            path: path.into(),
        }
    }

    /// A record ordered by its file name.
    pub fn keyed_by_name(name: impl Into<String>, path: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            key: name.clone(),
            name,
            path: path.into(),
        }
    }

    /// A record ordered by its content digest.
    pub fn keyed_by_digest(
        name: impl Into<String>,
        digest: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self::new(digest, name, path)
    }

    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }
}
