//! Line-oriented index files.
//!
//! Name-keyed files hold `<fileName> <filePath>` per line; hash-keyed files
//! hold `<fileName>|<fileHash>|<filePath>`. Neither format escapes its
//! delimiter, so records whose fields contain it (or a line break) are
//! refused at save time instead of being written in a form that would read
//! back differently.

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::Path;

use super::{write_atomically, LoadSummary};
use crate::error::{FileIndexError, Result};
use crate::record::KeyedRecord;
use crate::tree::OrderedIndexTree;
use crate::types::{DuplicatePolicy, KeyKind, TraversalOrder};

/// Layout of a text index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexFormat {
    /// `<fileName> <filePath>`, keyed by file name.
    NameKeyed,
    /// `<fileName>|<fileHash>|<filePath>`, keyed by hash.
    HashKeyed,
}

impl IndexFormat {
    pub fn for_key_kind(kind: KeyKind) -> Self {
        match kind {
            KeyKind::Name => Self::NameKeyed,
            KeyKind::Digest => Self::HashKeyed,
        }
    }

    /// Number of fields every line must split into.
    pub fn field_count(self) -> usize {
        match self {
            Self::NameKeyed => 2,
            Self::HashKeyed => 3,
        }
    }

    fn check_field(self, field: &'static str, value: &str) -> Result<()> {
        let reason = if value.contains(['\n', '\r']) {
            Some("a line break")
        } else {
            match self {
                Self::NameKeyed if value.is_empty() => Some("nothing"),
                Self::NameKeyed if value.chars().any(char::is_whitespace) => Some("whitespace"),
                Self::HashKeyed if value.contains('|') => Some("the '|' delimiter"),
                _ => None,
            }
        };
        match reason {
            Some(reason) => Err(FileIndexError::UnencodableField {
                field,
                value: value.to_owned(),
                reason,
            }),
            None => Ok(()),
        }
    }

    fn validate(self, record: &KeyedRecord) -> Result<()> {
        match self {
            Self::NameKeyed => {
                self.check_field("name", record.name())?;
                self.check_field("path", record.path())
            }
            Self::HashKeyed => {
                self.check_field("name", record.name())?;
                self.check_field("hash", record.key())?;
                self.check_field("path", record.path())
            }
        }
    }

    fn encode<W: Write>(self, record: &KeyedRecord, out: &mut W) -> std::io::Result<()> {
        match self {
            Self::NameKeyed => writeln!(out, "{} {}", record.name(), record.path()),
            Self::HashKeyed => writeln!(
                out,
                "{}|{}|{}",
                record.name(),
                record.key(),
                record.path()
            ),
        }
    }

    /// Parses one non-blank line, or `None` when the field count is wrong.
    fn decode(self, line: &str) -> Option<KeyedRecord> {
        match self {
            Self::NameKeyed => {
                let mut fields = line.split_whitespace();
                match (fields.next(), fields.next(), fields.next()) {
                    (Some(name), Some(path), None) => Some(KeyedRecord::keyed_by_name(name, path)),
                    _ => None,
                }
            }
            Self::HashKeyed => {
                let fields: Vec<&str> = line.split('|').collect();
                match fields.as_slice() {
                    [name, hash, path] => Some(KeyedRecord::keyed_by_digest(*name, *hash, *path)),
                    _ => None,
                }
            }
        }
    }
}

/// Writes every record of `tree` to `out`, one line each.
///
/// All records are validated before the first byte is written; a record
/// that cannot be encoded fails the whole call with
/// [`FileIndexError::UnencodableField`]. Returns the number of lines written.
pub fn write_index<W: Write>(
    tree: &OrderedIndexTree,
    format: IndexFormat,
    order: TraversalOrder,
    out: &mut W,
) -> Result<usize> {
    for record in tree {
        format.validate(record)?;
    }

    let mut written = 0;
    let mut emit = |record: &KeyedRecord| -> Result<()> {
        format.encode(record, out)?;
        written += 1;
        Ok(())
    };
    match order {
        TraversalOrder::InOrder => tree.iter().try_for_each(&mut emit)?,
        TraversalOrder::PreOrder => tree.iter_pre_order().try_for_each(&mut emit)?,
    }
    out.flush()?;
    Ok(written)
}

/// Rebuilds a tree from `source`, inserting records as they are read.
///
/// Blank lines are ignored. Lines that are not UTF-8 or have the wrong
/// number of fields are logged, counted and skipped; the load carries on
/// with the next line. Only an I/O failure of `source` aborts the read.
pub fn read_index<R: BufRead>(
    source: R,
    format: IndexFormat,
    policy: DuplicatePolicy,
) -> Result<(OrderedIndexTree, LoadSummary)> {
    let mut tree = OrderedIndexTree::new(policy);
    let mut summary = LoadSummary::default();

    for (line_no, raw) in source.split(b'\n').enumerate() {
        let raw = raw?;
        let Ok(line) = std::str::from_utf8(&raw) else {
            log::warn!("skipping index line {}: not valid UTF-8", line_no + 1);
            summary.malformed += 1;
            continue;
        };
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let Some(record) = format.decode(line) else {
            log::warn!(
                "skipping malformed index line {}: expected {} fields",
                line_no + 1,
                format.field_count()
            );
            summary.malformed += 1;
            continue;
        };

        if tree.insert(record).is_inserted() {
            summary.loaded += 1;
        } else {
            log::debug!("index line {} repeats an existing key", line_no + 1);
            summary.rejected += 1;
        }
    }

    Ok((tree, summary))
}

/// Saves `tree` to `path`, replacing any previous file.
pub fn save_to_path(
    tree: &OrderedIndexTree,
    format: IndexFormat,
    order: TraversalOrder,
    path: &Path,
) -> Result<usize> {
    let mut written = 0;
    write_atomically(path, |out| {
        written = write_index(tree, format, order, out)?;
        Ok(())
    })?;

    log::debug!("wrote index to {} ({} records)", path.display(), written);
    Ok(written)
}

/// Loads a tree from the index file at `path`.
///
/// A missing file is reported as [`FileIndexError::PathNotFound`].
pub fn load_from_path(
    path: &Path,
    format: IndexFormat,
    policy: DuplicatePolicy,
) -> Result<(OrderedIndexTree, LoadSummary)> {
    let input = match File::open(path) {
        Ok(file) => file,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            return Err(FileIndexError::PathNotFound(path.to_path_buf()))
        }
        Err(error) => return Err(error.into()),
    };

    let (tree, summary) = read_index(BufReader::new(input), format, policy)?;
    log::debug!(
        "loaded index from {} ({} records, {} malformed, {} rejected)",
        path.display(),
        summary.loaded,
        summary.malformed,
        summary.rejected
    );
    Ok((tree, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InsertOutcome;
    use std::io::Cursor;

    fn name_tree(entries: &[(&str, &str)]) -> OrderedIndexTree {
        let mut tree = OrderedIndexTree::new(DuplicatePolicy::Reject);
        for (name, path) in entries {
            assert_eq!(
                tree.insert(KeyedRecord::keyed_by_name(*name, *path)),
                InsertOutcome::Inserted
            );
        }
        tree
    }

    fn hash_tree(entries: &[(&str, &str, &str)]) -> OrderedIndexTree {
        let mut tree = OrderedIndexTree::new(DuplicatePolicy::Allow);
        for (name, hash, path) in entries {
            assert!(tree
                .insert(KeyedRecord::keyed_by_digest(*name, *hash, *path))
                .is_inserted());
        }
        tree
    }

    fn to_string(tree: &OrderedIndexTree, format: IndexFormat, order: TraversalOrder) -> String {
        let mut out = Vec::new();
        write_index(tree, format, order, &mut out).expect("write should succeed");
        String::from_utf8(out).expect("index is utf-8")
    }

    fn records(tree: &OrderedIndexTree) -> Vec<KeyedRecord> {
        tree.iter().cloned().collect()
    }

    #[test]
    fn name_keyed_lines() {
        let tree = name_tree(&[("m.txt", "/d/m.txt"), ("b.txt", "/d/b.txt")]);
        assert_eq!(
            to_string(&tree, IndexFormat::NameKeyed, TraversalOrder::InOrder),
            "b.txt /d/b.txt\nm.txt /d/m.txt\n"
        );
    }

    #[test]
    fn hash_keyed_lines() {
        let tree = hash_tree(&[("a.bin", "ff01", "/d/a.bin"), ("b.bin", "00aa", "/d/b.bin")]);
        assert_eq!(
            to_string(&tree, IndexFormat::HashKeyed, TraversalOrder::InOrder),
            "b.bin|00aa|/d/b.bin\na.bin|ff01|/d/a.bin\n"
        );
    }

    #[test]
    fn round_trip_preserves_records() {
        let tree = hash_tree(&[
            ("m", "55", "/m"),
            ("b", "22", "/b"),
            ("z", "99", "/z"),
            ("b2", "22", "/b2"),
        ]);
        for order in [TraversalOrder::InOrder, TraversalOrder::PreOrder] {
            let text = to_string(&tree, IndexFormat::HashKeyed, order);
            let (reloaded, summary) =
                read_index(Cursor::new(text), IndexFormat::HashKeyed, DuplicatePolicy::Allow)
                    .expect("read should succeed");
            assert_eq!(summary.loaded, 4);
            assert_eq!(summary.malformed, 0);
            let mut expected = records(&tree);
            let mut actual = records(&reloaded);
            expected.sort();
            actual.sort();
            assert_eq!(expected, actual);
        }
    }

    #[test]
    fn pre_order_reload_keeps_shape() {
        let tree = name_tree(&[("m", "/m"), ("b", "/b"), ("z", "/z"), ("a", "/a"), ("c", "/c")]);
        let text = to_string(&tree, IndexFormat::NameKeyed, TraversalOrder::PreOrder);
        let (reloaded, _) =
            read_index(Cursor::new(text), IndexFormat::NameKeyed, DuplicatePolicy::Reject)
                .expect("read should succeed");
        assert_eq!(reloaded.height(), tree.height());
        let shape: Vec<_> = reloaded.iter_pre_order().map(|r| r.key()).collect();
        assert_eq!(shape, vec!["m", "b", "a", "c", "z"]);
    }

    #[test]
    fn malformed_line_is_skipped() {
        let text = "a.bin|01|/d/a.bin\nbroken|/d/broken\nc.bin|03|/d/c.bin\n";
        let (tree, summary) =
            read_index(Cursor::new(text), IndexFormat::HashKeyed, DuplicatePolicy::Allow)
                .expect("read should succeed");
        assert_eq!(tree.len(), 2);
        assert_eq!(
            summary,
            LoadSummary {
                loaded: 2,
                malformed: 1,
                rejected: 0
            }
        );
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let text: &[u8] = b"a.bin|01|/d/a.bin\nbad\xff|02|/d/bad\nc.bin|03|/d/c.bin\n";
        let (tree, summary) =
            read_index(Cursor::new(text), IndexFormat::HashKeyed, DuplicatePolicy::Allow)
                .expect("read should succeed");
        assert_eq!(tree.len(), 2);
        assert_eq!(summary.malformed, 1);
        let paths: Vec<_> = tree.iter().map(|r| r.path()).collect();
        assert_eq!(paths, vec!["/d/a.bin", "/d/c.bin"]);
    }

    #[test]
    fn name_keyed_rejects_extra_fields() {
        let text = "a /a\nb /b extra\nc\n";
        let (tree, summary) =
            read_index(Cursor::new(text), IndexFormat::NameKeyed, DuplicatePolicy::Reject)
                .expect("read should succeed");
        assert_eq!(tree.len(), 1);
        assert_eq!(summary.malformed, 2);
    }

    #[test]
    fn blank_and_crlf_lines_are_tolerated() {
        let text = "a /a\r\n\n   \nb /b\r\n\n\n";
        let (tree, summary) =
            read_index(Cursor::new(text), IndexFormat::NameKeyed, DuplicatePolicy::Reject)
                .expect("read should succeed");
        assert_eq!(summary.malformed, 0);
        let paths: Vec<_> = tree.iter().map(|r| r.path()).collect();
        assert_eq!(paths, vec!["/a", "/b"]);
    }

    #[test]
    fn reload_applies_duplicate_policy() {
        let text = "a /first\na /second\n";
        let (tree, summary) =
            read_index(Cursor::new(text), IndexFormat::NameKeyed, DuplicatePolicy::Reject)
                .expect("read should succeed");
        assert_eq!(tree.len(), 1);
        assert_eq!(summary.rejected, 1);
        assert_eq!(tree.find("a").map(|r| r.path()), Some("/first"));
    }

    #[test]
    fn unencodable_fields_write_nothing() {
        let tree = name_tree(&[("a", "/ok"), ("b", "/has space")]);
        let mut out = Vec::new();
        let err = write_index(&tree, IndexFormat::NameKeyed, TraversalOrder::InOrder, &mut out)
            .expect_err("whitespace in a name-keyed path must fail");
        assert!(matches!(
            err,
            FileIndexError::UnencodableField { field: "path", .. }
        ));
        assert!(out.is_empty());

        let tree = hash_tree(&[("a|b", "01", "/x")]);
        let err = write_index(&tree, IndexFormat::HashKeyed, TraversalOrder::InOrder, &mut out)
            .expect_err("pipe in a hash-keyed name must fail");
        assert!(matches!(
            err,
            FileIndexError::UnencodableField { field: "name", .. }
        ));

        // Spaces are fine in the pipe-delimited format.
        let tree = hash_tree(&[("my file", "01", "/dir with space/my file")]);
        assert!(write_index(&tree, IndexFormat::HashKeyed, TraversalOrder::InOrder, &mut out).is_ok());
    }

    #[test]
    fn save_and_load_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fileIndex.txt");
        let tree = name_tree(&[("m", "/m"), ("b", "/b")]);

        let written = save_to_path(&tree, IndexFormat::NameKeyed, TraversalOrder::InOrder, &path)
            .expect("save should succeed");
        assert_eq!(written, 2);

        let (loaded, summary) =
            load_from_path(&path, IndexFormat::NameKeyed, DuplicatePolicy::Reject)
                .expect("load should succeed");
        assert_eq!(summary.loaded, 2);
        assert_eq!(records(&loaded), records(&tree));
    }

    #[test]
    fn failed_save_keeps_previous_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fileIndex.txt");
        std::fs::write(&path, "old /old\n").expect("seed file");

        let tree = name_tree(&[("bad", "/with space")]);
        assert!(save_to_path(&tree, IndexFormat::NameKeyed, TraversalOrder::InOrder, &path).is_err());
        assert_eq!(std::fs::read_to_string(&path).expect("read back"), "old /old\n");
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("absent.txt");
        let err = load_from_path(&path, IndexFormat::NameKeyed, DuplicatePolicy::Reject)
            .expect_err("missing file must fail");
        assert!(matches!(err, FileIndexError::PathNotFound(p) if p == path));
    }
}
