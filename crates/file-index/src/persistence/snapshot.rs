//! Compressed binary snapshots of the index.
//!
//! Records are stored in pre-order, so rebuilding from a snapshot reproduces
//! the saved tree's shape. Encoding is postcard, compressed with zstd.

use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::Path;
use std::thread::available_parallelism;

use serde::{Deserialize, Serialize};

use super::{unix_now_secs, write_atomically, LoadSummary};
use crate::error::{FileIndexError, Result};
use crate::record::KeyedRecord;
use crate::tree::OrderedIndexTree;
use crate::types::{DuplicatePolicy, KeyKind};

/// Snapshot format version - increment when changing the layout.
pub const SNAPSHOT_VERSION: u32 = 1;

/// zstd compression level for snapshots.
const COMPRESSION_LEVEL: i32 = 6;

/// Persisted form of an index.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub version: u32,
    /// How the saved index derived its keys.
    pub key_kind: KeyKind,
    pub policy: DuplicatePolicy,
    /// Unix timestamp of the save.
    pub saved_at: u64,
    /// Records in pre-order.
    pub records: Vec<KeyedRecord>,
}

/// Borrowing twin of `IndexSnapshot`; serializes to the same bytes.
#[derive(Serialize)]
struct IndexSnapshotRef<'a> {
    version: u32,
    key_kind: KeyKind,
    policy: DuplicatePolicy,
    saved_at: u64,
    records: Vec<&'a KeyedRecord>,
}

impl IndexSnapshot {
    /// Rebuilds the tree, inserting records in their saved order under `policy`.
    pub fn into_tree(self, policy: DuplicatePolicy) -> (OrderedIndexTree, LoadSummary) {
        let mut tree = OrderedIndexTree::new(policy);
        let mut summary = LoadSummary::default();
        for record in self.records {
            if tree.insert(record).is_inserted() {
                summary.loaded += 1;
            } else {
                summary.rejected += 1;
            }
        }
        (tree, summary)
    }
}

/// Writes `tree` to `path` as a compressed snapshot.
pub fn write_snapshot(tree: &OrderedIndexTree, key_kind: KeyKind, path: &Path) -> Result<()> {
    let snapshot = IndexSnapshotRef {
        version: SNAPSHOT_VERSION,
        key_kind,
        policy: tree.policy(),
        saved_at: unix_now_secs(),
        records: tree.iter_pre_order().collect(),
    };

    let bytes = postcard::to_stdvec(&snapshot).map_err(|error| {
        FileIndexError::Snapshot(format!("failed to encode snapshot with postcard: {error}"))
    })?;

    write_atomically(path, |output| {
        let mut encoder = zstd::Encoder::new(output, COMPRESSION_LEVEL)?;
        let threads = available_parallelism().map(|x| x.get() as u32).unwrap_or(4);
        encoder.multithread(threads)?;
        encoder.write_all(&bytes)?;
        encoder.finish()?;
        Ok(())
    })?;

    log::debug!(
        "wrote index snapshot to {} ({} records)",
        path.display(),
        tree.len()
    );
    Ok(())
}

/// Reads and validates the snapshot at `path`.
pub fn read_snapshot(path: &Path) -> Result<IndexSnapshot> {
    let input = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            return Err(FileIndexError::PathNotFound(path.to_path_buf()))
        }
        Err(error) => return Err(error.into()),
    };

    let mut decoder = zstd::Decoder::new(input)?;
    let mut bytes = Vec::new();
    decoder.read_to_end(&mut bytes).map_err(|error| {
        FileIndexError::Snapshot(format!(
            "failed to decompress snapshot {}: {error}",
            path.display()
        ))
    })?;

    let snapshot: IndexSnapshot = postcard::from_bytes(&bytes).map_err(|error| {
        FileIndexError::Snapshot(format!(
            "failed to decode snapshot {}: {error}",
            path.display()
        ))
    })?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(FileIndexError::Snapshot(format!(
            "snapshot version mismatch: {} != {}",
            snapshot.version, SNAPSHOT_VERSION
        )));
    }

    log::debug!(
        "read index snapshot from {} ({} records, saved_at={})",
        path.display(),
        snapshot.records.len(),
        snapshot.saved_at
    );
    Ok(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> OrderedIndexTree {
        let mut tree = OrderedIndexTree::new(DuplicatePolicy::Allow);
        for (name, digest) in [("m", "55"), ("b", "22"), ("z", "99"), ("b|2", "22")] {
            let record = KeyedRecord::keyed_by_digest(name, digest, format!("/dir with space/{name}"));
            assert!(tree.insert(record).is_inserted());
        }
        tree
    }

    #[test]
    fn snapshot_round_trip_keeps_records_and_shape() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("index.bin.zst");
        let tree = sample_tree();

        write_snapshot(&tree, KeyKind::Digest, &path).expect("write should succeed");
        let snapshot = read_snapshot(&path).expect("read should succeed");
        assert_eq!(snapshot.version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.key_kind, KeyKind::Digest);
        assert_eq!(snapshot.policy, DuplicatePolicy::Allow);

        let (restored, summary) = snapshot.into_tree(DuplicatePolicy::Allow);
        assert_eq!(summary.loaded, 4);
        assert_eq!(summary.rejected, 0);

        let expected: Vec<_> = tree.iter_pre_order().cloned().collect();
        let actual: Vec<_> = restored.iter_pre_order().cloned().collect();
        assert_eq!(expected, actual);
    }

    #[test]
    fn rebuilding_under_reject_drops_repeated_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("index.bin.zst");
        write_snapshot(&sample_tree(), KeyKind::Digest, &path).expect("write should succeed");

        let (restored, summary) = read_snapshot(&path)
            .expect("read should succeed")
            .into_tree(DuplicatePolicy::Reject);
        assert_eq!(restored.len(), 3);
        assert_eq!(summary.rejected, 1);
    }

    #[test]
    fn corrupt_snapshot_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("index.bin.zst");
        std::fs::write(&path, b"definitely not zstd").expect("seed file");

        let err = read_snapshot(&path).expect_err("garbage must not decode");
        assert!(matches!(err, FileIndexError::Snapshot(_) | FileIndexError::Io(_)));
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("index.bin.zst");
        let stale = IndexSnapshot {
            version: SNAPSHOT_VERSION + 1,
            key_kind: KeyKind::Name,
            policy: DuplicatePolicy::Reject,
            saved_at: 0,
            records: Vec::new(),
        };
        let bytes = postcard::to_stdvec(&stale).expect("encode");
        let compressed = zstd::encode_all(bytes.as_slice(), COMPRESSION_LEVEL).expect("compress");
        std::fs::write(&path, compressed).expect("seed file");

        let err = read_snapshot(&path).expect_err("newer version must be refused");
        assert!(matches!(err, FileIndexError::Snapshot(msg) if msg.contains("version mismatch")));
    }
}
