//! Extension to MIME lookup for the media types Shoebox accepts.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported extensions and the MIME type uploaded for each.
pub const SUPPORTED_EXTENSIONS: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("mp4", "video/mp4"),
    ("mov", "video/quicktime"),
];

/// Broad media category, decides how a thumbnail is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Category of a MIME type, `None` for anything that is neither image nor video.
    pub fn from_mime(mime_type: &str) -> Option<Self> {
        if mime_type.starts_with("image/") {
            Some(MediaKind::Image)
        } else if mime_type.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }
}

/// Lowercased extension of a path, if any.
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

pub fn is_supported_extension(extension: &str) -> bool {
    let extension = extension.to_lowercase();
    SUPPORTED_EXTENSIONS.iter().any(|(ext, _)| *ext == extension)
}

/// MIME type for a path based on its extension.
pub fn mime_type_for_path(path: &Path) -> Option<&'static str> {
    let extension = file_extension(path)?;
    SUPPORTED_EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime)| *mime)
}

/// Comma separated list of supported extensions, for error messages.
pub fn supported_extensions_list() -> String {
    SUPPORTED_EXTENSIONS
        .iter()
        .map(|(ext, _)| *ext)
        .collect::<Vec<_>>()
        .join(", ")
}
