//! Ordered file index with duplicate detection and persistence.
//!
//! This crate provides:
//! - An arena-backed binary search tree of file records
//! - Duplicate scanning by key, path or name
//! - Line-oriented index files and compressed binary snapshots
//! - SHA-256 content digests for digest-keyed indexes

pub mod config;
pub mod digest;
pub mod duplicates;
pub mod error;
pub mod index;
pub mod persistence;
pub mod record;
pub mod storage;
pub mod tree;
pub mod types;

// Re-export main types
pub use config::IndexConfig;
pub use duplicates::{DuplicateGroup, DuplicateGroups};
pub use error::{FileIndexError, Result};
pub use index::{FileIdentity, FileIndex};
pub use persistence::{IndexFormat, LoadSummary};
pub use record::KeyedRecord;
pub use tree::OrderedIndexTree;
pub use types::{DeleteOutcome, DuplicatePolicy, GroupBy, InsertOutcome, KeyKind, TraversalOrder};
