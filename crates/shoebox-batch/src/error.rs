use std::path::PathBuf;
use thiserror::Error;

/// Problems with the root directory of a scan
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort a whole batch run. Per-file failures never end up here.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Scan(#[from] ScanError),

    #[error("Failed to write audit log {}: {source}", path.display())]
    Audit {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Batch task failed: {0}")]
    Internal(String),
}
