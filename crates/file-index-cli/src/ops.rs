//! Operations shared by the one-shot commands and the interactive shell.

use std::path::Path;

use anyhow::{bail, Context};
use file_index::{
    DeleteOutcome, FileIdentity, FileIndex, FileIndexError, InsertOutcome, KeyKind, LoadSummary,
};

/// Loads the index at `path` into `index`; a missing file leaves it empty.
pub fn open_index(index: &mut FileIndex, path: &Path) -> anyhow::Result<Option<LoadSummary>> {
    match index.load_index(path) {
        Ok(summary) => {
            if summary.malformed > 0 {
                log::warn!(
                    "{}: skipped {} malformed line(s)",
                    path.display(),
                    summary.malformed
                );
            }
            Ok(Some(summary))
        }
        Err(FileIndexError::PathNotFound(_)) => {
            log::info!("{} does not exist yet, starting empty", path.display());
            Ok(None)
        }
        Err(error) => Err(error).with_context(|| format!("failed to load {}", path.display())),
    }
}

/// Adds the existing file at `path`, optionally under a different name.
pub fn add_path(index: &mut FileIndex, path: &Path, name: Option<&str>) -> anyhow::Result<InsertOutcome> {
    if !path.exists() {
        bail!("{} does not exist", path.display());
    }

    let identity = match (FileIdentity::for_path(index.config().key_kind, path)?, name) {
        (identity, None) => identity,
        (FileIdentity::Name(_), Some(name)) => FileIdentity::Name(name.to_owned()),
        (FileIdentity::Digest { digest, .. }, Some(name)) => FileIdentity::Digest {
            name: name.to_owned(),
            digest,
        },
    };

    let outcome = index.add_file(identity, path.to_string_lossy().into_owned())?;
    Ok(outcome)
}

/// Resolves a remove/find argument to the identity used as the tree key.
///
/// Name-keyed indexes take the argument's file name component. Digest-keyed
/// indexes hash the file the argument points at, which must still exist.
pub fn identity_for_target(index: &FileIndex, target: &str) -> anyhow::Result<FileIdentity> {
    let path = Path::new(target);
    match index.config().key_kind {
        KeyKind::Name => Ok(FileIdentity::from_path_name(path)?),
        KeyKind::Digest => {
            if !path.exists() {
                bail!("{target} does not exist; digest-keyed entries are located by hashing the file");
            }
            Ok(FileIdentity::from_file_contents(path)?)
        }
    }
}

/// Removes the entry `target` resolves to and returns the path it held.
///
/// With duplicate keys allowed, the removed entry is the equal-keyed one
/// nearest the tree root, which need not be the file `target` names.
pub fn remove_target(index: &mut FileIndex, target: &str) -> anyhow::Result<Option<String>> {
    let identity = identity_for_target(index, target)?;
    let Some(path) = index.find(&identity)?.map(|record| record.path().to_owned()) else {
        return Ok(None);
    };
    match index.remove_file(&identity)? {
        DeleteOutcome::Deleted => Ok(Some(path)),
        DeleteOutcome::NotFound => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use file_index::IndexConfig;

    #[test]
    fn add_and_remove_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "hello").unwrap();

        let mut index = FileIndex::default();
        assert_eq!(add_path(&mut index, &file, None).unwrap(), InsertOutcome::Inserted);
        assert_eq!(
            add_path(&mut index, &file, None).unwrap(),
            InsertOutcome::RejectedDuplicate
        );
        assert_eq!(
            add_path(&mut index, &file, Some("alias.txt")).unwrap(),
            InsertOutcome::Inserted
        );

        let identity = identity_for_target(&index, "notes.txt").unwrap();
        assert_eq!(index.remove_file(&identity).unwrap(), DeleteOutcome::Deleted);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn add_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = FileIndex::default();
        let err = add_path(&mut index, &dir.path().join("nope"), None).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
        assert!(index.is_empty());
    }

    #[test]
    fn digest_mode_hashes_targets() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "same").unwrap();
        std::fs::write(&b, "same").unwrap();

        let mut index = FileIndex::new(IndexConfig::for_key_kind(KeyKind::Digest));
        assert!(add_path(&mut index, &a, None).unwrap().is_inserted());
        assert!(add_path(&mut index, &b, None).unwrap().is_inserted());
        assert_eq!(index.len(), 2);

        let identity = identity_for_target(&index, b.to_str().unwrap()).unwrap();
        assert_eq!(identity.kind(), KeyKind::Digest);
        assert!(identity_for_target(&index, "/definitely/not/here").is_err());
    }

    #[test]
    fn remove_reports_the_path_actually_removed() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        std::fs::write(&a, "same").unwrap();
        std::fs::write(&b, "same").unwrap();

        let mut index = FileIndex::new(IndexConfig::for_key_kind(KeyKind::Digest));
        assert!(add_path(&mut index, &a, None).unwrap().is_inserted());
        assert!(add_path(&mut index, &b, None).unwrap().is_inserted());

        let b_target = b.to_str().unwrap();
        let removed = remove_target(&mut index, b_target).unwrap();
        assert_eq!(removed.as_deref(), a.to_str());
        let removed = remove_target(&mut index, b_target).unwrap();
        assert_eq!(removed.as_deref(), b.to_str());
        assert_eq!(remove_target(&mut index, b_target).unwrap(), None);
        assert!(index.is_empty());
    }

    #[test]
    fn open_missing_index_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut index = FileIndex::default();
        let summary = open_index(&mut index, &dir.path().join("fileIndex.txt")).unwrap();
        assert!(summary.is_none());
        assert!(index.is_empty());
    }
}
