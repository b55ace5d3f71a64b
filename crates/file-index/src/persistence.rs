//! Index persistence.
//!
//! Two on-disk forms are supported:
//! - `text` - the line-oriented index file, one record per line
//! - `snapshot` - a versioned postcard encoding compressed with zstd
//!
//! Both are written to a temp file next to the destination and then renamed
//! over it, so readers never see a half-written index.

mod snapshot;
mod text;

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use tempfile::NamedTempFile;

use crate::error::{FileIndexError, Result};

pub use snapshot::{read_snapshot, write_snapshot, IndexSnapshot, SNAPSHOT_VERSION};
pub use text::{load_from_path, read_index, save_to_path, write_index, IndexFormat};

/// Counts gathered while rebuilding a tree from persisted records.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Records inserted into the new tree.
    pub loaded: usize,
    /// Lines skipped because they did not split into the expected fields.
    pub malformed: usize,
    /// Records refused by the duplicate-key policy.
    pub rejected: usize,
}

/// Current time as seconds since the Unix epoch.
pub(crate) fn unix_now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// Writes `path` through a sibling temp file that is renamed into place once
/// `write` succeeds. On failure the previous file is left untouched.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut File>) -> Result<()>,
{
    let parent = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut tmp = NamedTempFile::new_in(parent).map_err(|error| {
        FileIndexError::Io(std::io::Error::new(
            error.kind(),
            format!("failed to create temp file in {}: {error}", parent.display()),
        ))
    })?;

    {
        let mut output = BufWriter::new(tmp.as_file_mut());
        write(&mut output)?;
        output.into_inner().map_err(|error| error.into_error())?;
    }

    tmp.persist(path).map_err(|error| {
        FileIndexError::Io(std::io::Error::new(
            error.error.kind(),
            format!("failed to finalize {}: {}", path.display(), error.error),
        ))
    })?;
    Ok(())
}
