//! Shoebox Core Library
//!
//! This crate provides the domain models, constants, configuration, and event
//! hooks shared by the thumbnail pipeline, the storage clients and the batch
//! uploader.

pub mod config;
pub mod constants;
pub mod hooks;
pub mod media;
pub mod models;

// Re-export commonly used types
pub use config::ShoeboxConfig;
pub use hooks::{BatchEvent, EventSender, TransferProgress};
pub use media::{mime_type_for_path, MediaKind};
pub use models::{
    BatchSummary, ProfileName, ThumbnailProfile, ThumbnailResult, UploadOutcome, UploadStatus,
};
