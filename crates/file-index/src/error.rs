use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FileIndexError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// A record field cannot be written without breaking the line format.
    #[error("Cannot encode {field} {value:?}: contains {reason}")]
    UnencodableField {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("Snapshot error: {0}")]
    Snapshot(String),

    #[error("Digest error for {path}: {source}")]
    Digest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, FileIndexError>;
