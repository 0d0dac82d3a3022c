//! Codec adapter
//!
//! One seam over the image decoder, the JPEG encoder and the ffmpeg frame
//! extractor so the thumbnail search can run against any implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use image::{DynamicImage, GenericImageView, ImageReader};
use shoebox_core::ShoeboxConfig;
use std::io::Cursor;
use std::path::Path;

use crate::compression::JpegEncoder;
use crate::image::resize_to_fit;
use crate::video::FrameExtractor;

/// A frame pulled out of a video.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Encoded frame exactly as the extractor produced it
    pub data: Vec<u8>,
    /// Dimensions of `data`
    pub width: u32,
    pub height: u32,
    /// Decoded frame, already fitted to the requested bounds
    pub raster: DynamicImage,
}

#[async_trait]
pub trait MediaCodec: Send + Sync {
    /// Decode an image file and shrink it to fit the bounds (never enlarges).
    async fn decode_and_resize(
        &self,
        path: &Path,
        max_width: u32,
        max_height: u32,
    ) -> Result<DynamicImage>;

    /// Extract a single frame at `at_second`, fitted to the bounds.
    async fn extract_frame(
        &self,
        path: &Path,
        at_second: f64,
        max_width: u32,
        max_height: u32,
    ) -> Result<VideoFrame>;

    /// Lossy encode at `quality` (0-100). CPU bound, call off the async pool.
    fn encode_jpeg(&self, raster: &DynamicImage, quality: u8) -> Result<Vec<u8>>;
}

/// Default adapter: `image` for decoding, mozjpeg for encoding, ffmpeg for video.
pub struct FfmpegCodec {
    frames: FrameExtractor,
}

impl FfmpegCodec {
    pub fn new(ffmpeg_path: String, ffprobe_path: String) -> Result<Self> {
        Ok(Self {
            frames: FrameExtractor::new(ffmpeg_path, ffprobe_path)?,
        })
    }

    pub fn from_config(config: &ShoeboxConfig) -> Result<Self> {
        Self::new(config.ffmpeg_path.clone(), config.ffprobe_path.clone())
    }
}

fn decode(data: &[u8]) -> Result<DynamicImage> {
    let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    Ok(reader.decode()?)
}

#[async_trait]
impl MediaCodec for FfmpegCodec {
    async fn decode_and_resize(
        &self,
        path: &Path,
        max_width: u32,
        max_height: u32,
    ) -> Result<DynamicImage> {
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        // Decode and resize are CPU-bound.
        let img = tokio::task::spawn_blocking(move || -> Result<DynamicImage> {
            let img = decode(&data).context("Failed to decode image")?;
            Ok(resize_to_fit(img, max_width, max_height))
        })
        .await??;
        Ok(img)
    }

    async fn extract_frame(
        &self,
        path: &Path,
        at_second: f64,
        max_width: u32,
        max_height: u32,
    ) -> Result<VideoFrame> {
        let data = self
            .frames
            .extract(path, at_second, max_width, max_height)
            .await?;

        let frame = tokio::task::spawn_blocking(move || -> Result<VideoFrame> {
            let img = decode(&data).context("Failed to decode extracted frame")?;
            let (width, height) = img.dimensions();
            Ok(VideoFrame {
                data,
                width,
                height,
                raster: resize_to_fit(img, max_width, max_height),
            })
        })
        .await??;
        Ok(frame)
    }

    fn encode_jpeg(&self, raster: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
        JpegEncoder::encode(raster, quality)
    }
}
