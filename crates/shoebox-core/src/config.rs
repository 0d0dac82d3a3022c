//! Configuration module
//!
//! Runtime settings are read from the environment (and an optional `.env`
//! file). Every setting has a default so a bare `shoebox <folder>` works.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::constants::DEFAULT_VIDEO_CAPTURE_SECOND;
use crate::models::{ProfileName, ThumbnailProfile};

const DEFAULT_FFMPEG_PATH: &str = "ffmpeg";
const DEFAULT_FFPROBE_PATH: &str = "ffprobe";
const DEFAULT_AUDIT_DIR: &str = ".";
const DEFAULT_STORAGE_PATH: &str = "./shoebox-drive";

/// Uploader configuration
#[derive(Clone, Debug)]
pub struct ShoeboxConfig {
    pub ffmpeg_path: String,
    pub ffprobe_path: String,
    pub thumbnail_profile: ThumbnailProfile,
    pub video_capture_second: f64,
    /// Directory holding success.txt, errors.txt and skipped.txt
    pub audit_dir: PathBuf,
    /// Root of the local storage backend
    pub storage_path: PathBuf,
    pub skip_duplicates: bool,
}

impl Default for ShoeboxConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: DEFAULT_FFMPEG_PATH.to_string(),
            ffprobe_path: DEFAULT_FFPROBE_PATH.to_string(),
            thumbnail_profile: ThumbnailProfile::default(),
            video_capture_second: DEFAULT_VIDEO_CAPTURE_SECOND,
            audit_dir: PathBuf::from(DEFAULT_AUDIT_DIR),
            storage_path: PathBuf::from(DEFAULT_STORAGE_PATH),
            skip_duplicates: false,
        }
    }
}

impl ShoeboxConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let ffmpeg_path = var("SHOEBOX_FFMPEG_PATH").unwrap_or(defaults.ffmpeg_path);
        validate_binary_path(&ffmpeg_path).context("Invalid SHOEBOX_FFMPEG_PATH")?;

        let ffprobe_path = var("SHOEBOX_FFPROBE_PATH").unwrap_or(defaults.ffprobe_path);
        validate_binary_path(&ffprobe_path).context("Invalid SHOEBOX_FFPROBE_PATH")?;

        let profile_name = match var("SHOEBOX_THUMBNAIL_PROFILE") {
            Some(value) => ProfileName::parse(&value)?,
            None => ProfileName::Default,
        };
        let mut thumbnail_profile = ThumbnailProfile::new(profile_name);
        if let Some(levels) = var("SHOEBOX_QUALITY_LEVELS") {
            let levels = levels
                .split(',')
                .map(|s| s.trim().parse::<u8>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| anyhow!("SHOEBOX_QUALITY_LEVELS must be a comma separated list of 0-100"))?;
            thumbnail_profile = thumbnail_profile.with_quality_levels(levels)?;
        }

        let video_capture_second = match var("SHOEBOX_VIDEO_CAPTURE_SECOND") {
            Some(value) => {
                let second = value
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| anyhow!("SHOEBOX_VIDEO_CAPTURE_SECOND must be a number"))?;
                if !second.is_finite() || second < 0.0 {
                    return Err(anyhow!("SHOEBOX_VIDEO_CAPTURE_SECOND must be >= 0"));
                }
                second
            }
            None => defaults.video_capture_second,
        };

        let skip_duplicates = var("SHOEBOX_SKIP_DUPLICATES")
            .map(|v| matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.skip_duplicates);

        Ok(Self {
            ffmpeg_path,
            ffprobe_path,
            thumbnail_profile,
            video_capture_second,
            audit_dir: var("SHOEBOX_AUDIT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.audit_dir),
            storage_path: var("SHOEBOX_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_path),
            skip_duplicates,
        })
    }
}

/// Reject executable paths carrying shell metacharacters.
pub fn validate_binary_path(path: &str) -> Result<()> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.trim().is_empty() {
        return Err(anyhow!("Executable path is empty"));
    }
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(anyhow!("Executable path contains dangerous characters: {}", path));
    }
    Ok(())
}
