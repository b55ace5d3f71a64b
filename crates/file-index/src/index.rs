//! The file index: the operation set callers drive.
//!
//! `FileIndex` owns one [`OrderedIndexTree`] and translates file identities
//! into tree keys. Negative results (`RejectedDuplicate`, `NotFound`) come
//! back as values; only I/O failures and misuse are errors.

use std::path::Path;

use crate::config::IndexConfig;
use crate::digest::digest_file;
use crate::duplicates::{self, DuplicateGroup};
use crate::error::{FileIndexError, Result};
use crate::persistence::{self, LoadSummary};
use crate::record::KeyedRecord;
use crate::tree::{InOrderIter, OrderedIndexTree};
use crate::types::{DeleteOutcome, GroupBy, InsertOutcome, KeyKind};

/// What identifies a file in the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileIdentity {
    /// Keyed by file name.
    Name(String),
    /// Keyed by a precomputed content digest.
    Digest { name: String, digest: String },
}

impl FileIdentity {
    /// The file name component of `path`, if it has one.
    pub fn name_of(path: &Path) -> Option<String> {
        path.file_name()
            .map(|name| name.to_string_lossy().into_owned())
    }

    /// Name identity taken from the last component of `path`.
    pub fn from_path_name(path: &Path) -> Result<Self> {
        Self::name_of(path).map(Self::Name).ok_or_else(|| {
            FileIndexError::InvalidInput(format!("{} has no file name", path.display()))
        })
    }

    /// Digest identity computed from the contents of the file at `path`.
    pub fn from_file_contents(path: &Path) -> Result<Self> {
        let name = Self::name_of(path).ok_or_else(|| {
            FileIndexError::InvalidInput(format!("{} has no file name", path.display()))
        })?;
        let digest = digest_file(path)?;
        Ok(Self::Digest { name, digest })
    }

    /// Builds the identity `kind` calls for from the file at `path`.
    pub fn for_path(kind: KeyKind, path: &Path) -> Result<Self> {
        match kind {
            KeyKind::Name => Self::from_path_name(path),
            KeyKind::Digest => Self::from_file_contents(path),
        }
    }

    pub fn kind(&self) -> KeyKind {
        match self {
            Self::Name(_) => KeyKind::Name,
            Self::Digest { .. } => KeyKind::Digest,
        }
    }

    /// The tree key this identity maps to.
    pub fn key(&self) -> &str {
        match self {
            Self::Name(name) => name,
            Self::Digest { digest, .. } => digest,
        }
    }
}

/// An in-memory file index with load/save support.
#[derive(Debug)]
pub struct FileIndex {
    config: IndexConfig,
    tree: OrderedIndexTree,
}

impl Default for FileIndex {
    fn default() -> Self {
        Self::new(IndexConfig::default())
    }
}

impl FileIndex {
    /// Creates an empty index.
    pub fn new(config: IndexConfig) -> Self {
        Self {
            tree: OrderedIndexTree::new(config.policy),
            config,
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn tree(&self) -> &OrderedIndexTree {
        &self.tree
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Adds `path` under `identity`.
    ///
    /// A duplicate refused by the policy is reported as
    /// [`InsertOutcome::RejectedDuplicate`], not as an error.
    pub fn add_file(&mut self, identity: FileIdentity, path: impl Into<String>) -> Result<InsertOutcome> {
        self.check_kind(&identity)?;
        let path = path.into();
        let record = match identity {
            FileIdentity::Name(name) => KeyedRecord::keyed_by_name(name, path),
            FileIdentity::Digest { name, digest } => {
                KeyedRecord::keyed_by_digest(name, digest, path)
            }
        };

        let key = record.key().to_owned();
        let outcome = self.tree.insert(record);
        match outcome {
            InsertOutcome::Inserted => log::debug!("indexed {key}"),
            InsertOutcome::RejectedDuplicate => log::info!("{key} is already indexed"),
        }
        Ok(outcome)
    }

    /// Removes the entry for `identity`; an absent entry is `NotFound`.
    pub fn remove_file(&mut self, identity: &FileIdentity) -> Result<DeleteOutcome> {
        self.check_kind(identity)?;
        let outcome = self.tree.delete(identity.key());
        if outcome == DeleteOutcome::NotFound {
            log::info!("{} is not in the index", identity.key());
        }
        Ok(outcome)
    }

    /// Looks up the entry for `identity`.
    pub fn find(&self, identity: &FileIdentity) -> Result<Option<&KeyedRecord>> {
        self.check_kind(identity)?;
        Ok(self.tree.find(identity.key()))
    }

    /// All records in ascending key order.
    pub fn records(&self) -> InOrderIter<'_> {
        self.tree.iter()
    }

    /// Groups sharing a `group_by` value with at least two paths.
    pub fn list_duplicates(&self, group_by: GroupBy) -> Vec<DuplicateGroup> {
        duplicates::report(duplicates::scan(&self.tree, group_by)).collect()
    }

    /// Writes the index to `path` in the configured text format.
    pub fn save_index(&self, path: &Path) -> Result<usize> {
        persistence::save_to_path(
            &self.tree,
            self.config.format(),
            self.config.save_order,
            path,
        )
    }

    /// Replaces the in-memory index with the one stored at `path`.
    ///
    /// The current records are kept if the file cannot be read.
    pub fn load_index(&mut self, path: &Path) -> Result<LoadSummary> {
        let (tree, summary) =
            persistence::load_from_path(path, self.config.format(), self.config.policy)?;
        self.tree = tree;
        Ok(summary)
    }

    /// Writes the index to `path` as a compressed snapshot.
    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        persistence::write_snapshot(&self.tree, self.config.key_kind, path)
    }

    /// Replaces the in-memory index with the snapshot stored at `path`.
    ///
    /// Snapshots taken from an index with a different key kind are refused.
    pub fn load_snapshot(&mut self, path: &Path) -> Result<LoadSummary> {
        let snapshot = persistence::read_snapshot(path)?;
        if snapshot.key_kind != self.config.key_kind {
            return Err(FileIndexError::InvalidInput(format!(
                "snapshot {} is keyed by {}, index is keyed by {}",
                path.display(),
                snapshot.key_kind.as_str(),
                self.config.key_kind.as_str()
            )));
        }
        let (tree, summary) = snapshot.into_tree(self.config.policy);
        self.tree = tree;
        Ok(summary)
    }

    fn check_kind(&self, identity: &FileIdentity) -> Result<()> {
        if identity.kind() == self.config.key_kind {
            Ok(())
        } else {
            Err(FileIndexError::InvalidInput(format!(
                "index is keyed by {}, got a {} identity",
                self.config.key_kind.as_str(),
                identity.kind().as_str()
            )))
        }
    }
}
