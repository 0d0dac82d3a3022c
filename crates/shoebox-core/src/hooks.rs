//! Progress events
//!
//! The batch uploader never calls back into its caller. Instead it writes
//! `BatchEvent`s into a one-way channel the caller may listen on; a dropped
//! receiver simply silences the events.

use tokio::sync::mpsc::UnboundedSender;

use crate::models::UploadStatus;

/// Event emitted while a batch runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    /// The directory scan finished and `total` files will be processed.
    ScanCompleted { total: usize },
    /// A window of `size` files was dispatched.
    WindowStarted { index: usize, size: usize },
    /// Byte-level transfer progress reported by the upload client.
    BytesUploaded {
        file_name: String,
        bytes_uploaded: u64,
        total_bytes: u64,
    },
    /// A file reached its terminal state. `completed` counts from 1 and is
    /// unique per run.
    FileCompleted {
        completed: usize,
        total: usize,
        file_name: String,
        status: UploadStatus,
    },
    /// Every file of the window is done and its outcomes are in the audit log.
    WindowCompleted { index: usize },
}

pub type EventSender = UnboundedSender<BatchEvent>;

/// Sends an event if anyone is listening.
pub fn emit(sender: Option<&EventSender>, event: BatchEvent) {
    if let Some(tx) = sender {
        let _ = tx.send(event);
    }
}

/// Per-file handle given to upload clients for byte progress reporting.
#[derive(Debug, Clone, Default)]
pub struct TransferProgress {
    sender: Option<EventSender>,
    file_name: String,
    total_bytes: u64,
}

impl TransferProgress {
    pub fn new(sender: Option<EventSender>, file_name: impl Into<String>, total_bytes: u64) -> Self {
        Self {
            sender,
            file_name: file_name.into(),
            total_bytes,
        }
    }

    /// A handle that drops every report.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn report(&self, bytes_uploaded: u64) {
        emit(
            self.sender.as_ref(),
            BatchEvent::BytesUploaded {
                file_name: self.file_name.clone(),
                bytes_uploaded,
                total_bytes: self.total_bytes,
            },
        );
    }
}
