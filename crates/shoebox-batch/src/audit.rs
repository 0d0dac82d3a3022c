//! Append-only audit trail of a run
//!
//! Three plain text files, one absolute path per line: uploaded files go to
//! `success.txt`, failures to `errors.txt` and duplicates to `skipped.txt`.

use shoebox_core::constants::{ERROR_LOG_FILE, SKIPPED_LOG_FILE, SUCCESS_LOG_FILE};
use shoebox_core::{UploadOutcome, UploadStatus};
use std::path::PathBuf;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

use crate::error::BatchError;

pub struct AuditLog {
    dir: PathBuf,
}

impl AuditLog {
    /// Create the audit directory if needed and truncate all three logs.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self, BatchError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .await
            .map_err(|source| BatchError::Audit {
                path: dir.clone(),
                source,
            })?;

        let log = Self { dir };
        for status in [UploadStatus::Uploaded, UploadStatus::Failed, UploadStatus::Skipped] {
            let path = log.path_for(status);
            fs::write(&path, b"")
                .await
                .map_err(|source| BatchError::Audit { path, source })?;
        }
        Ok(log)
    }

    pub fn path_for(&self, status: UploadStatus) -> PathBuf {
        let file = match status {
            UploadStatus::Uploaded => SUCCESS_LOG_FILE,
            UploadStatus::Failed => ERROR_LOG_FILE,
            UploadStatus::Skipped => SKIPPED_LOG_FILE,
        };
        self.dir.join(file)
    }

    /// Append one window's outcomes, grouped by status.
    pub async fn append_window(&self, outcomes: &[UploadOutcome]) -> Result<(), BatchError> {
        for status in [UploadStatus::Uploaded, UploadStatus::Failed, UploadStatus::Skipped] {
            let lines: String = outcomes
                .iter()
                .filter(|o| o.status == status)
                .map(|o| format!("{}\n", o.file_path.display()))
                .collect();
            if lines.is_empty() {
                continue;
            }

            let path = self.path_for(status);
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .await
                .map_err(|source| BatchError::Audit {
                    path: path.clone(),
                    source,
                })?;
            file.write_all(lines.as_bytes())
                .await
                .map_err(|source| BatchError::Audit {
                    path: path.clone(),
                    source,
                })?;
            // tokio hands writes to a blocking thread; wait for them to land.
            file.flush()
                .await
                .map_err(|source| BatchError::Audit { path, source })?;
        }
        Ok(())
    }
}
