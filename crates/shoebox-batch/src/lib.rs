//! Shoebox Batch Library
//!
//! Walks a directory tree and uploads every supported media file through an
//! [`UploadClient`](shoebox_storage::UploadClient), a fixed-size window of
//! files at a time, recording each outcome in three audit logs.

pub mod audit;
pub mod error;
pub mod orchestrator;
pub mod scanner;
pub mod sidecar;

pub use audit::AuditLog;
pub use error::{BatchError, ScanError};
pub use orchestrator::{BatchOrchestrator, RunOptions};
pub use scanner::scan;
pub use sidecar::{read_timestamps, sidecar_path, MediaTimestamps};
