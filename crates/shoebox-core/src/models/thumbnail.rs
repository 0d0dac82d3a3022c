use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_QUALITY_LEVELS, THUMBNAIL_SIZE_RESERVE_PERCENT};

/// Named thumbnail profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileName {
    #[default]
    Default, // 512x512, 64 KiB
    Photo, // 1920x1920, 1 MiB
}

impl ProfileName {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(ProfileName::Default),
            "photo" => Ok(ProfileName::Photo),
            _ => Err(anyhow!("Invalid thumbnail profile: {}", s)),
        }
    }
}

/// Dimension and byte ceilings a thumbnail must satisfy.
///
/// Profiles are built once at startup and shared read-only. The quality
/// ladder is part of the profile so it can be tuned per profile without
/// touching the search itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailProfile {
    pub name: ProfileName,
    pub max_width: u32,
    pub max_height: u32,
    pub max_size_bytes: u64,
    quality_levels: Vec<u8>,
}

impl ThumbnailProfile {
    pub fn new(name: ProfileName) -> Self {
        let (max_width, max_height, max_size_bytes) = match name {
            ProfileName::Default => (512, 512, 64 * 1024),
            ProfileName::Photo => (1920, 1920, 1024 * 1024),
        };
        Self {
            name,
            max_width,
            max_height,
            max_size_bytes,
            quality_levels: DEFAULT_QUALITY_LEVELS.to_vec(),
        }
    }

    pub fn photo() -> Self {
        Self::new(ProfileName::Photo)
    }

    /// Replace the quality ladder. Levels must be non-empty, within 0-100
    /// and strictly descending.
    pub fn with_quality_levels(mut self, levels: Vec<u8>) -> Result<Self> {
        if levels.is_empty() {
            return Err(anyhow!("Quality ladder must not be empty"));
        }
        if levels.iter().any(|q| *q > 100) {
            return Err(anyhow!("Quality levels must be between 0 and 100"));
        }
        if levels.windows(2).any(|pair| pair[0] <= pair[1]) {
            return Err(anyhow!(
                "Quality levels must be strictly descending: {:?}",
                levels
            ));
        }
        self.quality_levels = levels;
        Ok(self)
    }

    pub fn quality_levels(&self) -> &[u8] {
        &self.quality_levels
    }

    /// Largest payload the generator may emit: `floor(max_size_bytes * 0.9)`.
    pub fn target_max_size(&self) -> u64 {
        self.max_size_bytes * THUMBNAIL_SIZE_RESERVE_PERCENT / 100
    }
}

impl Default for ThumbnailProfile {
    fn default() -> Self {
        Self::new(ProfileName::Default)
    }
}

/// Encoded preview produced for a single source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailResult {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub size_bytes: u64,
}
