//! Recursive discovery of uploadable media files

use shoebox_core::media::{file_extension, is_supported_extension};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::ScanError;

/// Every file below `root` whose extension is supported, depth first in
/// directory enumeration order. Paths are absolute.
///
/// Symlinks are followed; a link is listed under its own path. Unreadable
/// entries below the root are logged and skipped.
pub fn scan(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let root = root.canonicalize().map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ScanError::NotFound(root.to_path_buf()),
        _ => ScanError::Io {
            path: root.to_path_buf(),
            source: e,
        },
    })?;
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(&root).follow_links(true) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::debug!(error = %e, "Skipping unreadable entry during scan");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let supported = file_extension(entry.path())
            .map(|ext| is_supported_extension(&ext))
            .unwrap_or(false);
        if supported {
            files.push(entry.into_path());
        }
    }

    tracing::debug!(root = %root.display(), files = files.len(), "Scan complete");
    Ok(files)
}
