mod helpers;

use helpers::*;
use shoebox_batch::{BatchOrchestrator, RunOptions};
use shoebox_core::ThumbnailProfile;
use shoebox_processing::{FfmpegCodec, ThumbnailGenerator};
use shoebox_storage::LocalDriveClient;
use std::sync::Arc;
use tempfile::tempdir;

#[tokio::test]
async fn test_upload_to_local_drive_and_skip_on_rerun() {
    let media = tempdir().unwrap();
    let drive_dir = tempdir().unwrap();
    let audit = tempdir().unwrap();
    std::fs::create_dir(media.path().join("holiday")).unwrap();
    write_png(media.path(), "wide.png", 1600, 900);
    write_jpeg(&media.path().join("holiday"), "tiny.jpg", 40, 30);

    let client = Arc::new(LocalDriveClient::open(drive_dir.path()).await.unwrap());
    let codec = FfmpegCodec::new("ffmpeg".to_string(), "ffprobe".to_string()).unwrap();
    let thumbnailer = Arc::new(ThumbnailGenerator::new(Arc::new(codec)));
    let profile = ThumbnailProfile::default();
    let orchestrator = BatchOrchestrator::new(client.clone(), thumbnailer, profile.clone())
        .with_audit_dir(audit.path());

    let options = RunOptions {
        skip_duplicates: true,
        parallelism: 2,
        events: None,
    };

    let first = orchestrator.run(media.path(), options.clone()).await.unwrap();
    assert_eq!(first.uploaded(), 2);

    let entries = client.entries().await;
    assert_eq!(entries.len(), 2);
    for entry in &entries {
        let thumb = drive_dir
            .path()
            .join("media")
            .join(&entry.node_id)
            .join("thumbnails")
            .join(format!("{}_thumbnail.jpg", entry.file_name));
        let data = std::fs::read(&thumb).unwrap();
        assert!(data.len() as u64 <= profile.target_max_size());

        let decoded = image::load_from_memory(&data).unwrap();
        assert!(decoded.width() <= profile.max_width);
        assert!(decoded.height() <= profile.max_height);
        if entry.file_name == "tiny.jpg" {
            assert_eq!((decoded.width(), decoded.height()), (40, 30));
        }
    }

    let second = orchestrator.run(media.path(), options).await.unwrap();
    assert_eq!(second.skipped(), 2);
    assert_eq!(read_log(audit.path().join("skipped.txt")).len(), 2);
    assert!(read_log(audit.path().join("success.txt")).is_empty());
    assert_eq!(client.entries().await.len(), 2);
}
