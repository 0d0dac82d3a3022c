use shoebox_core::{BatchEvent, BatchSummary, UploadStatus};
use std::path::{Path, PathBuf};

/// Window size from the `--parallel` argument. Anything that is not a
/// positive integer falls back to 1.
pub fn parse_parallelism(value: Option<&str>) -> usize {
    let Some(value) = value else {
        return 1;
    };
    match value.trim().parse::<usize>() {
        Ok(n) if n >= 1 => n,
        _ => {
            tracing::warn!(value = %value, "Invalid parallelism, falling back to 1");
            1
        }
    }
}

/// The folder given either positionally or with `--folder`. The flag wins.
pub fn resolve_folder(positional: Option<PathBuf>, flag: Option<PathBuf>) -> Option<PathBuf> {
    flag.or(positional)
}

/// Human readable byte count, e.g. `1.50 MB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", size, UNITS[unit])
}

/// One console line per interesting event.
pub fn format_event(event: &BatchEvent) -> Option<String> {
    match event {
        BatchEvent::ScanCompleted { total } => Some(format!("Found {} media files", total)),
        BatchEvent::FileCompleted {
            completed,
            total,
            file_name,
            status,
        } => {
            let label = match status {
                UploadStatus::Uploaded => "uploaded",
                UploadStatus::Skipped => "skipped",
                UploadStatus::Failed => "FAILED",
            };
            Some(format!("[{}/{}] {} {}", completed, total, label, file_name))
        }
        BatchEvent::BytesUploaded {
            file_name,
            bytes_uploaded,
            total_bytes,
        } if bytes_uploaded == total_bytes => Some(format!(
            "        {} sent ({})",
            file_name,
            format_bytes(*total_bytes)
        )),
        _ => None,
    }
}

/// End of run report: counts and where the audit logs are.
pub fn format_summary(summary: &BatchSummary, audit_dir: &Path) -> String {
    let mut out = String::new();
    out.push_str("\nUpload summary\n");
    out.push_str(&format!("  total:    {}\n", summary.total()));
    out.push_str(&format!("  uploaded: {}\n", summary.uploaded()));
    out.push_str(&format!("  skipped:  {}\n", summary.skipped()));
    out.push_str(&format!("  failed:   {}\n", summary.failed()));

    let failures: Vec<_> = summary
        .outcomes()
        .iter()
        .filter(|o| o.status == UploadStatus::Failed)
        .collect();
    if !failures.is_empty() {
        out.push_str("\nFailures\n");
        for outcome in failures {
            out.push_str(&format!(
                "  {}: {}\n",
                outcome.file_path.display(),
                outcome.error_message.as_deref().unwrap_or("unknown error")
            ));
        }
    }

    out.push_str(&format!("\nAudit logs in {}\n", audit_dir.display()));
    out
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}
