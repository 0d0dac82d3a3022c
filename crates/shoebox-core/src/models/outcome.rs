use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Terminal state of one file in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadStatus {
    Uploaded,
    Skipped,
    Failed,
}

/// Outcome recorded for a single media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOutcome {
    pub file_path: PathBuf,
    pub status: UploadStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl UploadOutcome {
    pub fn uploaded(file_path: PathBuf, node_id: String) -> Self {
        Self {
            file_path,
            status: UploadStatus::Uploaded,
            node_id: Some(node_id),
            error_message: None,
        }
    }

    pub fn skipped(file_path: PathBuf) -> Self {
        Self {
            file_path,
            status: UploadStatus::Skipped,
            node_id: None,
            error_message: None,
        }
    }

    pub fn failed(file_path: PathBuf, error_message: impl Into<String>) -> Self {
        Self {
            file_path,
            status: UploadStatus::Failed,
            node_id: None,
            error_message: Some(error_message.into()),
        }
    }
}

/// Aggregate view of a finished run.
///
/// Counters are derived from the outcome sequence and cannot be set
/// independently of it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchSummary {
    total: usize,
    uploaded: usize,
    skipped: usize,
    failed: usize,
    outcomes: Vec<UploadOutcome>,
}

impl BatchSummary {
    pub fn from_outcomes(outcomes: Vec<UploadOutcome>) -> Self {
        let count = |status: UploadStatus| outcomes.iter().filter(|o| o.status == status).count();
        Self {
            total: outcomes.len(),
            uploaded: count(UploadStatus::Uploaded),
            skipped: count(UploadStatus::Skipped),
            failed: count(UploadStatus::Failed),
            outcomes,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn uploaded(&self) -> usize {
        self.uploaded
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Outcomes in the order they were written to the audit log.
    pub fn outcomes(&self) -> &[UploadOutcome] {
        &self.outcomes
    }
}
