//! Single frame extraction for video thumbnails

use anyhow::{anyhow, Context, Result};
use shoebox_core::config::validate_binary_path;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use super::processor::VideoProbe;

/// How far before the end of the stream a past-the-end capture lands.
const LAST_FRAME_MARGIN_SECS: f64 = 0.1;

/// Clamp a requested capture timestamp to the stream duration.
///
/// Zero-length streams capture at 0; past-the-end requests capture the last
/// frame. An unknown duration leaves the request untouched.
pub fn clamp_capture_second(requested: f64, duration: Option<f64>) -> f64 {
    let requested = if requested.is_finite() {
        requested.max(0.0)
    } else {
        0.0
    };
    match duration {
        None => requested,
        Some(d) if d <= 0.0 => 0.0,
        Some(d) if requested < d => requested,
        Some(d) => (d - LAST_FRAME_MARGIN_SECS).max(0.0),
    }
}

pub struct FrameExtractor {
    ffmpeg_path: String,
    probe: VideoProbe,
    /// Where frame files are written; the system temp dir when unset
    temp_dir: Option<PathBuf>,
}

impl FrameExtractor {
    pub fn new(ffmpeg_path: String, ffprobe_path: String) -> Result<Self> {
        validate_binary_path(&ffmpeg_path).context("Invalid ffmpeg_path")?;
        Ok(Self {
            ffmpeg_path,
            probe: VideoProbe::new(ffprobe_path)?,
            temp_dir: None,
        })
    }

    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Extract one JPEG frame at `at_second`, scaled down to fit the bounds.
    ///
    /// The frame is written to a temporary file owned by this call; the file
    /// is removed when the call returns, whatever the result.
    #[tracing::instrument(skip(self), fields(process.executable.path = %self.ffmpeg_path))]
    pub async fn extract(
        &self,
        input_path: &Path,
        at_second: f64,
        max_width: u32,
        max_height: u32,
    ) -> Result<Vec<u8>> {
        let duration = match self.probe.probe(input_path).await {
            Ok(metadata) => metadata.duration,
            Err(e) => {
                tracing::warn!(error = %e, "Video probe failed, using requested capture time");
                None
            }
        };
        let timestamp = clamp_capture_second(at_second, duration);

        let mut builder = tempfile::Builder::new();
        builder.prefix("video_thumbnail_").suffix(".jpg");
        let frame_file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .context("Failed to create temporary frame file")?;

        let args = vec![
            "-ss".to_string(),
            format!("{:.3}", timestamp),
            "-i".to_string(),
            input_path.to_string_lossy().to_string(),
            "-frames:v".to_string(),
            "1".to_string(),
            "-vf".to_string(),
            format!(
                "scale=w=min({}\\,iw):h=min({}\\,ih):force_original_aspect_ratio=decrease",
                max_width, max_height
            ),
            "-q:v".to_string(),
            "2".to_string(),
            "-f".to_string(),
            "image2".to_string(),
            "-update".to_string(),
            "1".to_string(),
            "-y".to_string(),
            frame_file.path().to_string_lossy().to_string(),
        ];

        let output = Command::new(&self.ffmpeg_path)
            .args(&args)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("Failed to execute ffmpeg")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(anyhow!("FFmpeg frame extraction failed: {}", stderr));
        }

        let data = tokio::fs::read(frame_file.path())
            .await
            .context("Failed to read extracted frame")?;
        if data.is_empty() {
            return Err(anyhow!("FFmpeg produced no frame at {:.3}s", timestamp));
        }

        tracing::debug!(
            timestamp = timestamp,
            frame_bytes = data.len(),
            "Video frame extracted"
        );
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_within_duration() {
        assert_eq!(clamp_capture_second(1.0, Some(10.0)), 1.0);
        assert_eq!(clamp_capture_second(1.0, None), 1.0);
    }

    #[test]
    fn test_clamp_zero_duration() {
        assert_eq!(clamp_capture_second(1.0, Some(0.0)), 0.0);
    }

    #[test]
    fn test_clamp_past_end_uses_last_frame() {
        let clamped = clamp_capture_second(5.0, Some(2.0));
        assert!((clamped - 1.9).abs() < 1e-9);
        assert_eq!(clamp_capture_second(1.0, Some(0.05)), 0.0);
    }

    #[test]
    fn test_clamp_sanitizes_request() {
        assert_eq!(clamp_capture_second(-3.0, Some(10.0)), 0.0);
        assert_eq!(clamp_capture_second(f64::NAN, None), 0.0);
    }

    /// Executable shell script standing in for ffmpeg/ffprobe.
    #[cfg(unix)]
    fn stub(dir: &Path, name: &str, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[cfg(unix)]
    fn extractor(bin_dir: &Path, ffmpeg_body: &str, frames_dir: &Path) -> FrameExtractor {
        let ffmpeg = stub(bin_dir, "ffmpeg", ffmpeg_body);
        let ffprobe = stub(bin_dir, "ffprobe", "exit 1");
        FrameExtractor::new(ffmpeg, ffprobe)
            .unwrap()
            .with_temp_dir(frames_dir)
    }

    #[cfg(unix)]
    fn is_empty(dir: &Path) -> bool {
        std::fs::read_dir(dir).unwrap().next().is_none()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_frame_file_removed_after_success() {
        let bin = tempfile::tempdir().unwrap();
        let frames = tempfile::tempdir().unwrap();
        // The output path is the last argument.
        let ffmpeg = extractor(
            bin.path(),
            "for out; do :; done\nprintf 'jpegdata' > \"$out\"",
            frames.path(),
        );

        let data = ffmpeg
            .extract(Path::new("clip.mp4"), 1.0, 512, 512)
            .await
            .unwrap();

        assert_eq!(data, b"jpegdata");
        assert!(is_empty(frames.path()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_frame_file_removed_after_ffmpeg_failure() {
        let bin = tempfile::tempdir().unwrap();
        let frames = tempfile::tempdir().unwrap();
        let ffmpeg = extractor(bin.path(), "echo 'moov atom not found' >&2\nexit 1", frames.path());

        let err = ffmpeg
            .extract(Path::new("clip.mp4"), 1.0, 512, 512)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("moov atom not found"));
        assert!(is_empty(frames.path()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_frame_file_removed_when_no_frame_written() {
        let bin = tempfile::tempdir().unwrap();
        let frames = tempfile::tempdir().unwrap();
        let ffmpeg = extractor(bin.path(), "exit 0", frames.path());

        let err = ffmpeg
            .extract(Path::new("clip.mp4"), 1.0, 512, 512)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("produced no frame"));
        assert!(is_empty(frames.path()));
    }

    #[test]
    fn test_rejects_unsafe_binary() {
        assert!(FrameExtractor::new("ffmpeg|sh".to_string(), "ffprobe".to_string()).is_err());
        assert!(FrameExtractor::new("ffmpeg".to_string(), "ffprobe".to_string()).is_ok());
    }
}
