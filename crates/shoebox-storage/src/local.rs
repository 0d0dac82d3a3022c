//! Local filesystem upload backend
//!
//! Files land in `<root>/media/<node_id>/<file_name>` with their thumbnails
//! next to them under `thumbnails/`. `<root>/index.json` maps SHA-1
//! fingerprints to stored nodes and backs the duplicate lookup.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shoebox_core::TransferProgress;
use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::fingerprint::sha1_hex;
use crate::traits::{
    StorageError, StorageResult, Thumbnail, UploadClient, UploadController, UploadMetadata,
    UploadReceipt, Uploader,
};

const INDEX_FILE: &str = "index.json";
const MEDIA_DIR: &str = "media";
const THUMBNAILS_DIR: &str = "thumbnails";
/// Progress is reported after every chunk written.
const WRITE_CHUNK_SIZE: usize = 256 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub node_id: String,
    pub revision_id: String,
    pub file_name: String,
    pub media_type: String,
    pub size: u64,
    pub capture_time: Option<DateTime<Utc>>,
    pub modification_time: Option<DateTime<Utc>>,
    pub uploaded_at: DateTime<Utc>,
    pub thumbnails: Vec<String>,
}

/// On-disk index, keyed by SHA-1 hex.
#[derive(Debug, Default, Serialize, Deserialize)]
struct DriveIndex {
    entries: BTreeMap<String, Vec<IndexEntry>>,
}

impl DriveIndex {
    fn contains(&self, file_name: &str, sha1: &str) -> bool {
        self.entries
            .get(sha1)
            .map(|entries| entries.iter().any(|e| e.file_name == file_name))
            .unwrap_or(false)
    }
}

/// Upload client writing into a local directory
#[derive(Clone)]
pub struct LocalDriveClient {
    root: PathBuf,
    index: Arc<Mutex<DriveIndex>>,
}

impl LocalDriveClient {
    /// Open (or create) a drive rooted at `root`.
    pub async fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();

        fs::create_dir_all(root.join(MEDIA_DIR)).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;

        let index_path = root.join(INDEX_FILE);
        let index = if fs::try_exists(&index_path).await? {
            let raw = fs::read(&index_path).await?;
            serde_json::from_slice(&raw).map_err(|e| {
                StorageError::ConfigError(format!(
                    "Corrupt drive index {}: {}",
                    index_path.display(),
                    e
                ))
            })?
        } else {
            DriveIndex::default()
        };

        tracing::debug!(root = %root.display(), "Local drive opened");

        Ok(Self {
            root,
            index: Arc::new(Mutex::new(index)),
        })
    }

    /// All stored entries, ordered by fingerprint.
    pub async fn entries(&self) -> Vec<IndexEntry> {
        let index = self.index.lock().await;
        index.entries.values().flatten().cloned().collect()
    }
}

/// Reject names that would escape the node directory.
fn validate_file_name(file_name: &str) -> StorageResult<()> {
    let mut components = Path::new(file_name).components();
    let single_component = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    if !single_component || file_name.contains('/') || file_name.contains('\\') {
        return Err(StorageError::InvalidName(file_name.to_string()));
    }
    Ok(())
}

async fn write_file(path: &Path, data: &[u8], progress: Option<&TransferProgress>) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let mut file = fs::File::create(path).await.map_err(|e| {
        StorageError::UploadFailed(format!("Failed to create file {}: {}", path.display(), e))
    })?;

    let mut written = 0u64;
    for chunk in data.chunks(WRITE_CHUNK_SIZE) {
        file.write_all(chunk).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;
        written += chunk.len() as u64;
        if let Some(progress) = progress {
            progress.report(written);
        }
    }

    file.sync_all().await.map_err(|e| {
        StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
    })?;
    Ok(())
}

#[async_trait]
impl UploadClient for LocalDriveClient {
    async fn get_uploader(
        &self,
        file_name: &str,
        metadata: UploadMetadata,
    ) -> StorageResult<Box<dyn Uploader>> {
        validate_file_name(file_name)?;
        Ok(Box::new(LocalUploader {
            drive: self.clone(),
            file_name: file_name.to_string(),
            metadata,
        }))
    }

    async fn is_duplicate(&self, file_name: &str, sha1_hex: &str) -> StorageResult<bool> {
        let index = self.index.lock().await;
        Ok(index.contains(file_name, sha1_hex))
    }
}

pub struct LocalUploader {
    drive: LocalDriveClient,
    file_name: String,
    metadata: UploadMetadata,
}

impl LocalUploader {
    async fn store(
        self,
        data: Vec<u8>,
        thumbnails: Vec<Thumbnail>,
        progress: TransferProgress,
    ) -> StorageResult<UploadReceipt> {
        if data.len() as u64 != self.metadata.expected_size {
            return Err(StorageError::UploadFailed(format!(
                "Size mismatch for {}: expected {} bytes, got {}",
                self.file_name,
                self.metadata.expected_size,
                data.len()
            )));
        }
        for thumbnail in &thumbnails {
            validate_file_name(&thumbnail.file_name)?;
        }

        let start = std::time::Instant::now();
        let node_id = Uuid::new_v4().to_string();
        let revision_id = Uuid::new_v4().to_string();
        let node_dir = self.drive.root.join(MEDIA_DIR).join(&node_id);

        write_file(&node_dir.join(&self.file_name), &data, Some(&progress)).await?;

        let mut thumbnail_names = Vec::with_capacity(thumbnails.len());
        for thumbnail in &thumbnails {
            write_file(
                &node_dir.join(THUMBNAILS_DIR).join(&thumbnail.file_name),
                &thumbnail.data,
                None,
            )
            .await?;
            thumbnail_names.push(thumbnail.file_name.clone());
        }

        let entry = IndexEntry {
            node_id: node_id.clone(),
            revision_id: revision_id.clone(),
            file_name: self.file_name.clone(),
            media_type: self.metadata.media_type.clone(),
            size: data.len() as u64,
            capture_time: self.metadata.capture_time,
            modification_time: self.metadata.modification_time,
            uploaded_at: Utc::now(),
            thumbnails: thumbnail_names,
        };

        // Held until the index file is rewritten.
        let mut index = self.drive.index.lock().await;
        index
            .entries
            .entry(sha1_hex(&data))
            .or_default()
            .push(entry);
        let serialized = serde_json::to_vec_pretty(&*index)
            .map_err(|e| StorageError::BackendError(format!("Failed to encode index: {}", e)))?;
        fs::write(self.drive.root.join(INDEX_FILE), serialized).await?;
        drop(index);

        tracing::info!(
            file_name = %self.file_name,
            node_id = %node_id,
            size_bytes = data.len(),
            thumbnails = thumbnails.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local drive upload successful"
        );

        Ok(UploadReceipt {
            node_id,
            revision_id,
        })
    }
}

#[async_trait]
impl Uploader for LocalUploader {
    async fn upload(
        self: Box<Self>,
        data: Vec<u8>,
        thumbnails: Vec<Thumbnail>,
        progress: TransferProgress,
    ) -> StorageResult<Box<dyn UploadController>> {
        let task = tokio::spawn((*self).store(data, thumbnails, progress));
        Ok(Box::new(LocalUploadController { task }))
    }
}

pub struct LocalUploadController {
    task: JoinHandle<StorageResult<UploadReceipt>>,
}

#[async_trait]
impl UploadController for LocalUploadController {
    async fn completion(self: Box<Self>) -> StorageResult<UploadReceipt> {
        self.task
            .await
            .map_err(|e| StorageError::BackendError(format!("Upload task failed: {}", e)))?
    }
}
