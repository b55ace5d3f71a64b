//! SHA-256 content digests for digest-keyed indexes.

use std::fs::File;
use std::io::{self, BufReader, ErrorKind};
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{FileIndexError, Result};

/// Read buffer size used while hashing.
const HASH_BUFFER_SIZE: usize = 8 * 1024;

/// Lowercase hex SHA-256 of `bytes`.
pub fn digest_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Lowercase hex SHA-256 of the file at `path`.
pub fn digest_file(path: &Path) -> Result<String> {
    let wrap = |source: std::io::Error| {
        if source.kind() == ErrorKind::NotFound {
            FileIndexError::PathNotFound(path.to_path_buf())
        } else {
            FileIndexError::Digest {
                path: path.to_path_buf(),
                source,
            }
        }
    };

    let file = File::open(path).map_err(wrap)?;
    let mut reader = BufReader::with_capacity(HASH_BUFFER_SIZE, file);
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher).map_err(wrap)?;
    Ok(hex::encode(hasher.finalize()))
}
