//! Media fixtures and a stand-in thumbnailer.

use async_trait::async_trait;
use image::{ImageFormat, Rgb, RgbImage};
use shoebox_core::{MediaKind, ThumbnailProfile, ThumbnailResult};
use shoebox_processing::{ThumbnailError, Thumbnailer};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

fn gradient(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    })
}

/// Write a real JPEG of the given size and return its path.
pub fn write_jpeg(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    gradient(width, height)
        .save_with_format(&path, ImageFormat::Jpeg)
        .unwrap();
    path
}

pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    gradient(width, height)
        .save_with_format(&path, ImageFormat::Png)
        .unwrap();
    path
}

/// Non-empty lines of an audit log.
pub fn read_log(path: PathBuf) -> Vec<String> {
    std::fs::read_to_string(path)
        .unwrap()
        .lines()
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

/// Thumbnailer returning a fixed tiny preview and counting its calls.
#[derive(Default)]
pub struct CountingThumbnailer {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingThumbnailer {
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Thumbnailer for CountingThumbnailer {
    async fn generate(
        &self,
        _path: &Path,
        _kind: MediaKind,
        profile: &ThumbnailProfile,
        _video_capture_second: f64,
    ) -> Result<ThumbnailResult, ThumbnailError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ThumbnailError::SizeBoundUnsatisfied {
                target_max_size: profile.target_max_size(),
            });
        }
        Ok(ThumbnailResult {
            data: vec![0xff, 0xd8, 0xff, 0xd9],
            width: 16,
            height: 16,
            size_bytes: 4,
        })
    }
}
