use shoebox_core::media::{file_extension, mime_type_for_path, supported_extensions_list};
use std::path::Path;

/// Reasons a file is rejected before any upload work starts
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Not a regular file: {0}")]
    NotAFile(String),

    #[error("File has no extension: {0}")]
    MissingExtension(String),

    #[error("Unsupported file extension: {extension} (supported: {supported})")]
    UnsupportedExtension { extension: String, supported: String },

    #[error("Empty file: {0}")]
    EmptyFile(String),

    #[error("Failed to inspect {path}: {message}")]
    Io { path: String, message: String },
}

/// Media file validator
///
/// Checks that a path is a non-empty regular file with a supported extension
/// and hands back the MIME type the upload should carry.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaValidator;

impl MediaValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate extension only and return the MIME type
    pub fn validate_extension(&self, path: &Path) -> Result<&'static str, ValidationError> {
        let extension = file_extension(path)
            .ok_or_else(|| ValidationError::MissingExtension(path.display().to_string()))?;

        mime_type_for_path(path).ok_or(ValidationError::UnsupportedExtension {
            extension,
            supported: supported_extensions_list(),
        })
    }

    /// Validate a file on disk and return its MIME type
    pub async fn validate(&self, path: &Path) -> Result<&'static str, ValidationError> {
        let metadata = match tokio::fs::metadata(path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ValidationError::NotFound(path.display().to_string()));
            }
            Err(e) => {
                return Err(ValidationError::Io {
                    path: path.display().to_string(),
                    message: e.to_string(),
                });
            }
        };

        if !metadata.is_file() {
            return Err(ValidationError::NotAFile(path.display().to_string()));
        }

        let mime_type = self.validate_extension(path)?;

        if metadata.len() == 0 {
            return Err(ValidationError::EmptyFile(path.display().to_string()));
        }

        Ok(mime_type)
    }
}
