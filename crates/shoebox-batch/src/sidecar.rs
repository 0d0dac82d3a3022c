//! Metadata sidecars
//!
//! Photo exports often ship a `<file>.supplemental-metadata.json` next to
//! each media file carrying the original capture and creation times as
//! string-encoded Unix seconds.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use shoebox_core::constants::SIDECAR_SUFFIX;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Sidecar {
    photo_taken_time: Option<SidecarTime>,
    creation_time: Option<SidecarTime>,
}

#[derive(Debug, Deserialize)]
struct SidecarTime {
    timestamp: Option<String>,
}

impl SidecarTime {
    fn to_utc(&self) -> Option<DateTime<Utc>> {
        let seconds = self.timestamp.as_deref()?.trim().parse::<i64>().ok()?;
        DateTime::from_timestamp(seconds, 0)
    }
}

/// Timestamps attached to an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaTimestamps {
    pub capture_time: DateTime<Utc>,
    pub modification_time: DateTime<Utc>,
}

/// `<media_path>.supplemental-metadata.json`
pub fn sidecar_path(media_path: &Path) -> PathBuf {
    let mut name = OsString::from(media_path.as_os_str());
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}

/// Capture and modification time for `media_path`.
///
/// `photoTakenTime` sets the capture time and `creationTime` the
/// modification time. Anything missing or unreadable falls back to `now`.
pub async fn read_timestamps(media_path: &Path, now: DateTime<Utc>) -> MediaTimestamps {
    let path = sidecar_path(media_path);
    let sidecar = match tokio::fs::read(&path).await {
        Ok(raw) => match serde_json::from_slice::<Sidecar>(&raw) {
            Ok(sidecar) => sidecar,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed metadata sidecar");
                Sidecar::default()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Sidecar::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to read metadata sidecar");
            Sidecar::default()
        }
    };

    MediaTimestamps {
        capture_time: sidecar
            .photo_taken_time
            .as_ref()
            .and_then(SidecarTime::to_utc)
            .unwrap_or(now),
        modification_time: sidecar
            .creation_time
            .as_ref()
            .and_then(SidecarTime::to_utc)
            .unwrap_or(now),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            sidecar_path(Path::new("/photos/IMG_1.jpg")),
            PathBuf::from("/photos/IMG_1.jpg.supplemental-metadata.json")
        );
    }

    #[tokio::test]
    async fn test_reads_both_timestamps() {
        let dir = tempdir().unwrap();
        let media = dir.path().join("IMG_1.jpg");
        std::fs::write(
            sidecar_path(&media),
            r#"{
                "title": "IMG_1.jpg",
                "photoTakenTime": {"timestamp": "1000000000", "formatted": "Sep 9, 2001"},
                "creationTime": {"timestamp": "1500000000"}
            }"#,
        )
        .unwrap();

        let timestamps = read_timestamps(&media, now()).await;
        assert_eq!(
            timestamps.capture_time,
            Utc.with_ymd_and_hms(2001, 9, 9, 1, 46, 40).unwrap()
        );
        assert_eq!(
            timestamps.modification_time,
            Utc.with_ymd_and_hms(2017, 7, 14, 2, 40, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_missing_sidecar_defaults_to_now() {
        let dir = tempdir().unwrap();
        let timestamps = read_timestamps(&dir.path().join("a.png"), now()).await;
        assert_eq!(timestamps.capture_time, now());
        assert_eq!(timestamps.modification_time, now());
    }

    #[tokio::test]
    async fn test_partial_and_malformed_fields() {
        let dir = tempdir().unwrap();
        let media = dir.path().join("b.mp4");
        std::fs::write(
            sidecar_path(&media),
            r#"{"photoTakenTime": {"timestamp": "yesterday"}, "creationTime": {"timestamp": "1000000000"}}"#,
        )
        .unwrap();

        let timestamps = read_timestamps(&media, now()).await;
        assert_eq!(timestamps.capture_time, now());
        assert_eq!(timestamps.modification_time.timestamp(), 1_000_000_000);
    }

    #[tokio::test]
    async fn test_invalid_json_is_ignored() {
        let dir = tempdir().unwrap();
        let media = dir.path().join("c.jpg");
        std::fs::write(sidecar_path(&media), b"{ nope").unwrap();

        let timestamps = read_timestamps(&media, now()).await;
        assert_eq!(timestamps.capture_time, now());
    }
}
