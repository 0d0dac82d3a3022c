//! Data models shared across Shoebox crates.

mod outcome;
mod thumbnail;

pub use outcome::{BatchSummary, UploadOutcome, UploadStatus};
pub use thumbnail::{ProfileName, ThumbnailProfile, ThumbnailResult};
