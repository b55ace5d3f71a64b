//! Outcome and policy types shared across the index.

use serde::{Deserialize, Serialize};

/// Result of inserting a record into the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum InsertOutcome {
    Inserted,
    /// An equal key is already present and the policy refuses duplicates.
    RejectedDuplicate,
}

impl InsertOutcome {
    pub fn is_inserted(self) -> bool {
        self == Self::Inserted
    }
}

/// Result of deleting a key from the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

impl DeleteOutcome {
    pub fn is_deleted(self) -> bool {
        self == Self::Deleted
    }
}

/// What the tree does when a new record's key equals an existing key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Leave the tree unchanged and report `RejectedDuplicate`.
    Reject,
    /// Route the record into the right subtree so both coexist.
    Allow,
}

impl DuplicatePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Allow => "allow",
        }
    }
}

/// Where a record's ordering key comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyKind {
    /// The file name component of the path.
    Name,
    /// The content digest of the file.
    Digest,
}

impl KeyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Digest => "digest",
        }
    }
}

/// Field used to group records when scanning for duplicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupBy {
    /// The ordering key (same content when keyed by digest).
    #[default]
    Key,
    /// The filesystem path (the same file indexed more than once).
    Path,
    /// The display name (same file name in different directories).
    Name,
}

impl GroupBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Key => "key",
            Self::Path => "path",
            Self::Name => "name",
        }
    }
}

/// Order in which records are visited when writing an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalOrder {
    /// Ascending key order.
    #[default]
    InOrder,
    /// Node before its subtrees; reloading reproduces the tree's shape.
    PreOrder,
}
