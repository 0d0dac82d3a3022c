//! Application-wide constants.

/// JPEG quality ladder tried from best to worst when fitting a thumbnail
/// under its byte ceiling.
pub const DEFAULT_QUALITY_LEVELS: [u8; 14] = [95, 90, 85, 80, 70, 60, 50, 40, 30, 20, 15, 10, 5, 0];

/// Share of a profile's byte ceiling a thumbnail may occupy. The rest is left
/// for the storage client's envelope and encryption overhead.
pub const THUMBNAIL_SIZE_RESERVE_PERCENT: u64 = 90;

/// Timestamp (seconds) at which a video frame is captured for its thumbnail.
pub const DEFAULT_VIDEO_CAPTURE_SECOND: f64 = 1.0;

/// Suffix appended to a media path to locate its metadata sidecar.
pub const SIDECAR_SUFFIX: &str = ".supplemental-metadata.json";

/// Audit log receiving paths of uploaded files.
pub const SUCCESS_LOG_FILE: &str = "success.txt";

/// Audit log receiving paths of failed files.
pub const ERROR_LOG_FILE: &str = "errors.txt";

/// Audit log receiving paths of files skipped as duplicates.
pub const SKIPPED_LOG_FILE: &str = "skipped.txt";

/// MIME type of every generated thumbnail.
pub const THUMBNAIL_MIME_TYPE: &str = "image/jpeg";
