//! Index configuration.

use crate::persistence::IndexFormat;
use crate::types::{DuplicatePolicy, KeyKind, TraversalOrder};

/// How a [`FileIndex`](crate::FileIndex) keys, orders and stores its records.
///
/// The text format is not stored; it always follows `key_kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexConfig {
    pub key_kind: KeyKind,
    pub policy: DuplicatePolicy,
    pub save_order: TraversalOrder,
}

impl IndexConfig {
    /// Defaults for a key kind.
    ///
    /// Name-keyed indexes refuse a second file with the same name; digest-keyed
    /// indexes keep every file, since identical content is what they look for.
    pub fn for_key_kind(key_kind: KeyKind) -> Self {
        let policy = match key_kind {
            KeyKind::Name => DuplicatePolicy::Reject,
            KeyKind::Digest => DuplicatePolicy::Allow,
        };
        Self {
            key_kind,
            policy,
            save_order: TraversalOrder::InOrder,
        }
    }

    /// Line format of the text index file for this key kind.
    pub fn format(&self) -> IndexFormat {
        IndexFormat::for_key_kind(self.key_kind)
    }

    pub fn with_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_save_order(mut self, save_order: TraversalOrder) -> Self {
        self.save_order = save_order;
        self
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self::for_key_kind(KeyKind::Name)
    }
}
