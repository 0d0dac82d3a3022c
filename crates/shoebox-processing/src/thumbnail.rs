//! Adaptive thumbnail generation
//!
//! A thumbnail is fitted into the profile's pixel bounds, then encoded at
//! successively lower JPEG qualities until it fits under
//! `ThumbnailProfile::target_max_size`. The first level that fits wins.

use async_trait::async_trait;
use image::{DynamicImage, GenericImageView};
use shoebox_core::{MediaKind, ThumbnailProfile, ThumbnailResult};
use std::path::Path;
use std::sync::Arc;

use crate::codec::MediaCodec;

#[derive(Debug, thiserror::Error)]
pub enum ThumbnailError {
    #[error("Failed to decode source: {0}")]
    Decode(String),

    #[error("Failed to extract video frame: {0}")]
    FrameExtraction(String),

    #[error("Failed to encode thumbnail: {0}")]
    Encode(String),

    #[error("cannot satisfy size bound: no quality level fits within {target_max_size} bytes")]
    SizeBoundUnsatisfied { target_max_size: u64 },

    #[error("Thumbnail task failed: {0}")]
    Internal(String),
}

/// Anything able to turn a media file into a compliant thumbnail.
#[async_trait]
pub trait Thumbnailer: Send + Sync {
    async fn generate(
        &self,
        path: &Path,
        kind: MediaKind,
        profile: &ThumbnailProfile,
        video_capture_second: f64,
    ) -> Result<ThumbnailResult, ThumbnailError>;
}

/// Walk the quality ladder and return the first encoding within `target_max_size`
/// together with the quality that produced it.
pub fn select_quality(
    codec: &dyn MediaCodec,
    raster: &DynamicImage,
    quality_levels: &[u8],
    target_max_size: u64,
) -> Result<(Vec<u8>, u8), ThumbnailError> {
    for &quality in quality_levels {
        let encoded = codec
            .encode_jpeg(raster, quality)
            .map_err(|e| ThumbnailError::Encode(format!("{:#}", e)))?;
        if encoded.len() as u64 <= target_max_size {
            return Ok((encoded, quality));
        }
        tracing::trace!(
            quality = quality,
            size_bytes = encoded.len(),
            target_max_size = target_max_size,
            "Thumbnail too large, lowering quality"
        );
    }
    Err(ThumbnailError::SizeBoundUnsatisfied { target_max_size })
}

/// What the decode stage hands to the quality search.
enum BaseRaster {
    Raster(DynamicImage),
    /// Extracted video frame that already satisfies the profile.
    Ready(ThumbnailResult),
}

pub struct ThumbnailGenerator {
    codec: Arc<dyn MediaCodec>,
}

impl ThumbnailGenerator {
    pub fn new(codec: Arc<dyn MediaCodec>) -> Self {
        Self { codec }
    }

    async fn base_raster(
        &self,
        path: &Path,
        kind: MediaKind,
        profile: &ThumbnailProfile,
        video_capture_second: f64,
    ) -> Result<BaseRaster, ThumbnailError> {
        match kind {
            MediaKind::Image => self
                .codec
                .decode_and_resize(path, profile.max_width, profile.max_height)
                .await
                .map(BaseRaster::Raster)
                .map_err(|e| ThumbnailError::Decode(format!("{:#}", e))),
            MediaKind::Video => {
                let frame = self
                    .codec
                    .extract_frame(
                        path,
                        video_capture_second,
                        profile.max_width,
                        profile.max_height,
                    )
                    .await
                    .map_err(|e| ThumbnailError::FrameExtraction(format!("{:#}", e)))?;

                let fits = frame.data.len() as u64 <= profile.target_max_size()
                    && frame.width <= profile.max_width
                    && frame.height <= profile.max_height;
                if fits {
                    return Ok(BaseRaster::Ready(ThumbnailResult {
                        size_bytes: frame.data.len() as u64,
                        width: frame.width,
                        height: frame.height,
                        data: frame.data,
                    }));
                }
                Ok(BaseRaster::Raster(frame.raster))
            }
        }
    }
}

#[async_trait]
impl Thumbnailer for ThumbnailGenerator {
    #[tracing::instrument(skip(self, profile), fields(profile_name = ?profile.name))]
    async fn generate(
        &self,
        path: &Path,
        kind: MediaKind,
        profile: &ThumbnailProfile,
        video_capture_second: f64,
    ) -> Result<ThumbnailResult, ThumbnailError> {
        let target_max_size = profile.target_max_size();

        let raster = match self
            .base_raster(path, kind, profile, video_capture_second)
            .await?
        {
            BaseRaster::Raster(raster) => raster,
            BaseRaster::Ready(ready) => {
                tracing::debug!(
                    width = ready.width,
                    height = ready.height,
                    size_bytes = ready.size_bytes,
                    "Extracted frame already within size bound"
                );
                return Ok(ready);
            }
        };

        let (width, height) = raster.dimensions();
        let codec = Arc::clone(&self.codec);
        let levels = profile.quality_levels().to_vec();
        let (data, quality) = tokio::task::spawn_blocking(move || {
            select_quality(codec.as_ref(), &raster, &levels, target_max_size)
        })
        .await
        .map_err(|e| ThumbnailError::Internal(e.to_string()))??;

        tracing::debug!(
            width = width,
            height = height,
            size_bytes = data.len(),
            quality = quality,
            "Thumbnail generated"
        );

        Ok(ThumbnailResult {
            size_bytes: data.len() as u64,
            width,
            height,
            data,
        })
    }
}
