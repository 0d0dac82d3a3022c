//! Upload client abstraction
//!
//! The batch uploader only ever sees these traits. Session handling,
//! encryption and the wire protocol are the implementation's business.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shoebox_core::constants::THUMBNAIL_MIME_TYPE;
use shoebox_core::{ProfileName, ThumbnailResult, TransferProgress};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Duplicate check failed: {0}")]
    DuplicateCheckFailed(String),

    #[error("Invalid file name: {0}")]
    InvalidName(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Metadata sent along with a file when the uploader is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadMetadata {
    pub media_type: String,
    pub expected_size: u64,
    pub modification_time: Option<DateTime<Utc>>,
    pub capture_time: Option<DateTime<Utc>>,
    /// Numeric photo tags (0-9).
    pub tags: Vec<u8>,
}

/// A preview image attached to an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub file_name: String,
    pub mime_type: String,
    pub kind: ProfileName,
    pub data: Vec<u8>,
}

impl Thumbnail {
    /// Wrap a generated thumbnail for `source_file_name`, named `<source>_thumbnail.jpg`.
    pub fn for_source(source_file_name: &str, kind: ProfileName, result: ThumbnailResult) -> Self {
        Self {
            file_name: format!("{}_thumbnail.jpg", source_file_name),
            mime_type: THUMBNAIL_MIME_TYPE.to_string(),
            kind,
            data: result.data,
        }
    }
}

/// Identifiers of the stored node once an upload has completed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub node_id: String,
    pub revision_id: String,
}

/// Entry point of an upload backend.
#[async_trait]
pub trait UploadClient: Send + Sync {
    /// Prepare the upload of a single file.
    async fn get_uploader(
        &self,
        file_name: &str,
        metadata: UploadMetadata,
    ) -> StorageResult<Box<dyn Uploader>>;

    /// Whether a file with this name and SHA-1 fingerprint is already stored.
    async fn is_duplicate(&self, file_name: &str, sha1_hex: &str) -> StorageResult<bool>;
}

/// Single-use handle that starts the transfer of one file.
#[async_trait]
pub trait Uploader: Send {
    /// Start transferring `data` and its thumbnails. Byte progress is
    /// reported through `progress` while the transfer runs.
    async fn upload(
        self: Box<Self>,
        data: Vec<u8>,
        thumbnails: Vec<Thumbnail>,
        progress: TransferProgress,
    ) -> StorageResult<Box<dyn UploadController>>;
}

/// Handle on a running transfer.
#[async_trait]
pub trait UploadController: Send {
    /// Wait until the transfer is finished.
    async fn completion(self: Box<Self>) -> StorageResult<UploadReceipt>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumbnail_naming() {
        let result = ThumbnailResult {
            data: vec![1, 2, 3],
            width: 10,
            height: 5,
            size_bytes: 3,
        };
        let thumbnail = Thumbnail::for_source("IMG_0001.JPG", ProfileName::Default, result);

        assert_eq!(thumbnail.file_name, "IMG_0001.JPG_thumbnail.jpg");
        assert_eq!(thumbnail.mime_type, "image/jpeg");
        assert_eq!(thumbnail.data, vec![1, 2, 3]);
    }
}
