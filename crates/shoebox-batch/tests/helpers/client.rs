//! In-memory upload client recording every call.

use async_trait::async_trait;
use shoebox_core::TransferProgress;
use shoebox_storage::{
    StorageError, StorageResult, Thumbnail, UploadClient, UploadController, UploadMetadata,
    UploadReceipt, Uploader,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct RecordedUpload {
    pub file_name: String,
    pub metadata: UploadMetadata,
    pub size: usize,
    pub thumbnails: Vec<Thumbnail>,
}

#[derive(Default)]
struct State {
    uploads: Mutex<Vec<RecordedUpload>>,
    duplicate_checks: Mutex<Vec<(String, String)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

#[derive(Default)]
pub struct MockUploadClient {
    failing: HashSet<String>,
    duplicates: HashSet<String>,
    duplicate_check_fails: bool,
    transfer_delay: Duration,
    state: Arc<State>,
}

impl MockUploadClient {
    pub fn new() -> Self {
        Self {
            transfer_delay: Duration::from_millis(50),
            ..Default::default()
        }
    }

    /// Uploads of this file name fail at completion.
    pub fn failing(mut self, file_name: &str) -> Self {
        self.failing.insert(file_name.to_string());
        self
    }

    /// This file name is reported as already stored.
    pub fn duplicate(mut self, file_name: &str) -> Self {
        self.duplicates.insert(file_name.to_string());
        self
    }

    pub fn with_failing_duplicate_check(mut self) -> Self {
        self.duplicate_check_fails = true;
        self
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.state.uploads.lock().unwrap().clone()
    }

    pub fn upload_named(&self, file_name: &str) -> Option<RecordedUpload> {
        self.uploads().into_iter().find(|u| u.file_name == file_name)
    }

    /// `(file_name, sha1)` of every duplicate lookup.
    pub fn duplicate_checks(&self) -> Vec<(String, String)> {
        self.state.duplicate_checks.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.state.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UploadClient for MockUploadClient {
    async fn get_uploader(
        &self,
        file_name: &str,
        metadata: UploadMetadata,
    ) -> StorageResult<Box<dyn Uploader>> {
        Ok(Box::new(MockUploader {
            file_name: file_name.to_string(),
            metadata,
            fail: self.failing.contains(file_name),
            delay: self.transfer_delay,
            state: Arc::clone(&self.state),
        }))
    }

    async fn is_duplicate(&self, file_name: &str, sha1_hex: &str) -> StorageResult<bool> {
        self.state
            .duplicate_checks
            .lock()
            .unwrap()
            .push((file_name.to_string(), sha1_hex.to_string()));
        if self.duplicate_check_fails {
            return Err(StorageError::DuplicateCheckFailed("lookup unavailable".to_string()));
        }
        Ok(self.duplicates.contains(file_name))
    }
}

struct MockUploader {
    file_name: String,
    metadata: UploadMetadata,
    fail: bool,
    delay: Duration,
    state: Arc<State>,
}

#[async_trait]
impl Uploader for MockUploader {
    async fn upload(
        self: Box<Self>,
        data: Vec<u8>,
        thumbnails: Vec<Thumbnail>,
        progress: TransferProgress,
    ) -> StorageResult<Box<dyn UploadController>> {
        let now = self.state.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.state.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.state.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail {
            return Ok(Box::new(MockController {
                result: Err(StorageError::UploadFailed("simulated transfer error".to_string())),
            }));
        }

        progress.report(data.len() as u64);
        let node_id = format!("node-{}", self.file_name);
        self.state.uploads.lock().unwrap().push(RecordedUpload {
            file_name: self.file_name.clone(),
            metadata: self.metadata.clone(),
            size: data.len(),
            thumbnails,
        });

        Ok(Box::new(MockController {
            result: Ok(UploadReceipt {
                node_id,
                revision_id: "rev-1".to_string(),
            }),
        }))
    }
}

struct MockController {
    result: StorageResult<UploadReceipt>,
}

#[async_trait]
impl UploadController for MockController {
    async fn completion(self: Box<Self>) -> StorageResult<UploadReceipt> {
        self.result
    }
}
