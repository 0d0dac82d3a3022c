//! Batch upload orchestration
//!
//! Files are processed in fixed windows of `parallelism` files. Every file in
//! a window runs concurrently, and the next window starts only once the whole
//! window has finished and its outcomes are in the audit log.

use chrono::Utc;
use futures::future::join_all;
use shoebox_core::hooks::emit;
use shoebox_core::{
    BatchEvent, BatchSummary, MediaKind, ShoeboxConfig, ThumbnailProfile, TransferProgress,
    UploadOutcome,
};
use shoebox_processing::{MediaValidator, Thumbnailer};
use shoebox_storage::{sha1_hex, Thumbnail, UploadClient, UploadMetadata};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::audit::AuditLog;
use crate::error::BatchError;
use crate::scanner::scan;
use crate::sidecar::read_timestamps;

/// Per-run knobs.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub skip_duplicates: bool,
    /// Files per window. Zero is treated as one.
    pub parallelism: usize,
    pub events: Option<shoebox_core::EventSender>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            skip_duplicates: false,
            parallelism: 1,
            events: None,
        }
    }
}

pub struct BatchOrchestrator {
    client: Arc<dyn UploadClient>,
    thumbnailer: Arc<dyn Thumbnailer>,
    profile: ThumbnailProfile,
    video_capture_second: f64,
    audit_dir: PathBuf,
    validator: MediaValidator,
}

/// Shared state of one run.
struct RunContext<'a> {
    options: &'a RunOptions,
    total: usize,
    completed: AtomicUsize,
}

impl BatchOrchestrator {
    pub fn new(
        client: Arc<dyn UploadClient>,
        thumbnailer: Arc<dyn Thumbnailer>,
        profile: ThumbnailProfile,
    ) -> Self {
        let defaults = ShoeboxConfig::default();
        Self {
            client,
            thumbnailer,
            profile,
            video_capture_second: defaults.video_capture_second,
            audit_dir: defaults.audit_dir,
            validator: MediaValidator::new(),
        }
    }

    pub fn from_config(
        client: Arc<dyn UploadClient>,
        thumbnailer: Arc<dyn Thumbnailer>,
        config: &ShoeboxConfig,
    ) -> Self {
        Self::new(client, thumbnailer, config.thumbnail_profile.clone())
            .with_video_capture_second(config.video_capture_second)
            .with_audit_dir(config.audit_dir.clone())
    }

    pub fn with_audit_dir(mut self, audit_dir: impl Into<PathBuf>) -> Self {
        self.audit_dir = audit_dir.into();
        self
    }

    pub fn with_video_capture_second(mut self, second: f64) -> Self {
        self.video_capture_second = second;
        self
    }

    /// Upload every supported file under `root`.
    ///
    /// Only a bad root directory or an audit log write failure aborts the
    /// run; everything that goes wrong with a single file becomes a failed
    /// outcome in the summary.
    #[tracing::instrument(skip(self, options), fields(parallelism = options.parallelism))]
    pub async fn run(&self, root: &Path, options: RunOptions) -> Result<BatchSummary, BatchError> {
        let root_buf = root.to_path_buf();
        let files = tokio::task::spawn_blocking(move || scan(&root_buf))
            .await
            .map_err(|e| BatchError::Internal(e.to_string()))??;

        let audit = AuditLog::create(&self.audit_dir).await?;
        let parallelism = options.parallelism.max(1);
        let total = files.len();

        tracing::info!(total = total, parallelism = parallelism, "Starting batch upload");
        emit(options.events.as_ref(), BatchEvent::ScanCompleted { total });

        let ctx = RunContext {
            options: &options,
            total,
            completed: AtomicUsize::new(0),
        };

        let mut outcomes = Vec::with_capacity(total);
        for (index, window) in files.chunks(parallelism).enumerate() {
            tracing::debug!(window = index, size = window.len(), "Window started");
            emit(
                options.events.as_ref(),
                BatchEvent::WindowStarted {
                    index,
                    size: window.len(),
                },
            );

            let window_outcomes =
                join_all(window.iter().map(|path| self.process_file(path.clone(), &ctx))).await;

            audit.append_window(&window_outcomes).await?;
            tracing::debug!(window = index, "Window completed");
            emit(options.events.as_ref(), BatchEvent::WindowCompleted { index });

            outcomes.extend(window_outcomes);
        }

        let summary = BatchSummary::from_outcomes(outcomes);
        tracing::info!(
            total = summary.total(),
            uploaded = summary.uploaded(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            "Batch upload finished"
        );
        Ok(summary)
    }

    async fn process_file(&self, path: PathBuf, ctx: &RunContext<'_>) -> UploadOutcome {
        let outcome = match self.upload_file(&path, ctx.options).await {
            Ok(Some(node_id)) => {
                tracing::info!(path = %path.display(), node_id = %node_id, "Uploaded");
                UploadOutcome::uploaded(path, node_id)
            }
            Ok(None) => {
                tracing::info!(path = %path.display(), "Skipped duplicate");
                UploadOutcome::skipped(path)
            }
            Err(message) => {
                tracing::warn!(path = %path.display(), error = %message, "Upload failed");
                UploadOutcome::failed(path, message)
            }
        };

        let completed = ctx.completed.fetch_add(1, Ordering::SeqCst) + 1;
        emit(
            ctx.options.events.as_ref(),
            BatchEvent::FileCompleted {
                completed,
                total: ctx.total,
                file_name: file_name_of(&outcome.file_path),
                status: outcome.status,
            },
        );
        outcome
    }

    /// `Ok(Some(node_id))` when uploaded, `Ok(None)` when skipped as a duplicate.
    async fn upload_file(&self, path: &Path, options: &RunOptions) -> Result<Option<String>, String> {
        let mime_type = self.validator.validate(path).await.map_err(|e| e.to_string())?;
        let file_name = file_name_of(path);

        let data = tokio::fs::read(path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

        let data = if options.skip_duplicates {
            let (data, sha1) = tokio::task::spawn_blocking(move || {
                let sha1 = sha1_hex(&data);
                (data, sha1)
            })
            .await
            .map_err(|e| format!("Fingerprinting failed: {}", e))?;

            if self.is_duplicate(&file_name, &sha1).await {
                return Ok(None);
            }
            data
        } else {
            data
        };

        let timestamps = read_timestamps(path, Utc::now()).await;
        let thumbnails = self.thumbnail_for(path, &file_name, mime_type).await;

        let metadata = UploadMetadata {
            media_type: mime_type.to_string(),
            expected_size: data.len() as u64,
            modification_time: Some(timestamps.modification_time),
            capture_time: Some(timestamps.capture_time),
            tags: Vec::new(),
        };
        let progress =
            TransferProgress::new(options.events.clone(), file_name.clone(), data.len() as u64);

        let uploader = self
            .client
            .get_uploader(&file_name, metadata)
            .await
            .map_err(|e| e.to_string())?;
        let controller = uploader
            .upload(data, thumbnails, progress)
            .await
            .map_err(|e| e.to_string())?;
        let receipt = controller.completion().await.map_err(|e| e.to_string())?;

        Ok(Some(receipt.node_id))
    }

    /// Duplicate lookup failures are logged and treated as "not a duplicate".
    async fn is_duplicate(&self, file_name: &str, sha1: &str) -> bool {
        match self.client.is_duplicate(file_name, sha1).await {
            Ok(duplicate) => duplicate,
            Err(e) => {
                tracing::warn!(file_name = %file_name, error = %e, "Duplicate check failed, uploading anyway");
                false
            }
        }
    }

    /// Zero or one thumbnail. Generation problems never fail the upload.
    async fn thumbnail_for(&self, path: &Path, file_name: &str, mime_type: &str) -> Vec<Thumbnail> {
        let Some(kind) = MediaKind::from_mime(mime_type) else {
            return Vec::new();
        };

        match self
            .thumbnailer
            .generate(path, kind, &self.profile, self.video_capture_second)
            .await
        {
            Ok(result) => {
                tracing::debug!(
                    file_name = %file_name,
                    width = result.width,
                    height = result.height,
                    size_bytes = result.size_bytes,
                    "Thumbnail ready"
                );
                vec![Thumbnail::for_source(file_name, self.profile.name, result)]
            }
            Err(e) => {
                tracing::warn!(file_name = %file_name, error = %e, "Thumbnail generation failed, continuing without thumbnail");
                Vec::new()
            }
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
