//! Video probe - stream metadata via ffprobe

use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use shoebox_core::config::validate_binary_path;
use std::path::Path;
use tokio::process::Command;

/// Video metadata
#[derive(Debug, Clone, PartialEq)]
pub struct VideoMetadata {
    /// Container duration in seconds, when ffprobe reports one
    pub duration: Option<f64>,
    pub width: u32,
    pub height: u32,
    pub codec: String,
}

pub struct VideoProbe {
    ffprobe_path: String,
}

impl VideoProbe {
    pub fn new(ffprobe_path: String) -> Result<Self> {
        validate_binary_path(&ffprobe_path).context("Invalid ffprobe_path")?;
        Ok(Self { ffprobe_path })
    }

    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffprobe",
        process.executable.path = %self.ffprobe_path
    ))]
    pub async fn probe(&self, video_path: &Path) -> Result<VideoMetadata> {
        let start = std::time::Instant::now();

        let output = Command::new(&self.ffprobe_path)
            .args([
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
                "-select_streams",
                "v:0",
            ])
            .arg(video_path)
            .output()
            .await
            .context("Failed to execute ffprobe")?;

        if !output.status.success() {
            return Err(anyhow!(
                "ffprobe failed: {}",
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        let metadata = parse_probe_output(&output.stdout)?;

        tracing::debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            video_duration = ?metadata.duration,
            width = metadata.width,
            height = metadata.height,
            codec = %metadata.codec,
            "Video probe completed"
        );

        Ok(metadata)
    }
}

/// Parse the JSON document printed by `ffprobe -print_format json`.
pub fn parse_probe_output(stdout: &[u8]) -> Result<VideoMetadata> {
    let probe_data: Value =
        serde_json::from_slice(stdout).context("Failed to parse ffprobe output")?;

    let stream = probe_data["streams"]
        .get(0)
        .ok_or_else(|| anyhow!("No video stream found"))?;

    let duration = probe_data["format"]["duration"]
        .as_str()
        .and_then(|d| d.parse::<f64>().ok())
        .filter(|d| d.is_finite());

    let width = stream["width"]
        .as_u64()
        .ok_or_else(|| anyhow!("Could not parse width"))? as u32;

    let height = stream["height"]
        .as_u64()
        .ok_or_else(|| anyhow!("Could not parse height"))? as u32;

    let codec = stream["codec_name"]
        .as_str()
        .unwrap_or("unknown")
        .to_string();

    Ok(VideoMetadata {
        duration,
        width,
        height,
        codec,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_probe_output() {
        let json = br#"{
            "streams": [{"codec_name": "h264", "width": 1920, "height": 1080}],
            "format": {"duration": "12.480000", "bit_rate": "4000000"}
        }"#;
        let metadata = parse_probe_output(json).unwrap();
        assert_eq!(metadata.duration, Some(12.48));
        assert_eq!((metadata.width, metadata.height), (1920, 1080));
        assert_eq!(metadata.codec, "h264");
    }

    #[test]
    fn test_parse_probe_output_without_duration() {
        let json = br#"{"streams": [{"width": 640, "height": 360}], "format": {}}"#;
        let metadata = parse_probe_output(json).unwrap();
        assert_eq!(metadata.duration, None);
        assert_eq!(metadata.codec, "unknown");
    }

    #[test]
    fn test_parse_probe_output_without_stream() {
        let json = br#"{"streams": [], "format": {"duration": "3.0"}}"#;
        assert!(parse_probe_output(json).is_err());
        assert!(parse_probe_output(b"not json").is_err());
    }

    #[test]
    fn test_probe_rejects_unsafe_binary() {
        assert!(VideoProbe::new("ffprobe && whoami".to_string()).is_err());
        assert!(VideoProbe::new("/usr/bin/ffprobe".to_string()).is_ok());
    }
}
