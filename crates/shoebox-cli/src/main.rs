//! Shoebox: upload a folder of photos and videos with thumbnails.
//!
//! Configuration comes from SHOEBOX_* environment variables (or a .env file);
//! the flags below override them for a single run.

use anyhow::Context;
use clap::{CommandFactory, Parser};
use shoebox_batch::{BatchOrchestrator, RunOptions};
use shoebox_cli::{format_event, format_summary, init_tracing, parse_parallelism, resolve_folder};
use shoebox_core::{ProfileName, ShoeboxConfig, ThumbnailProfile};
use shoebox_processing::{FfmpegCodec, ThumbnailGenerator};
use shoebox_storage::LocalDriveClient;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "shoebox", about = "Batch upload photos and videos", version)]
struct Cli {
    /// Folder to upload
    path: Option<PathBuf>,
    /// Folder to upload (alternative to the positional argument)
    #[arg(short = 'f', long = "folder")]
    folder: Option<PathBuf>,
    /// Number of files uploaded at the same time
    #[arg(short = 'p', long = "parallel")]
    parallel: Option<String>,
    /// Skip files that are already stored
    #[arg(short = 's', long)]
    skip_duplicates: bool,
    /// Thumbnail profile: default or photo
    #[arg(long)]
    profile: Option<String>,
    /// Root directory of the local drive
    #[arg(long)]
    storage: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let Some(folder) = resolve_folder(cli.path, cli.folder) else {
        eprintln!("error: no folder given\n");
        let _ = Cli::command().print_help();
        std::process::exit(1);
    };

    let mut config = ShoeboxConfig::from_env().context("Failed to load configuration")?;
    if let Some(profile) = cli.profile.as_deref() {
        config.thumbnail_profile = ThumbnailProfile::new(ProfileName::parse(profile)?)
            .with_quality_levels(config.thumbnail_profile.quality_levels().to_vec())?;
    }
    if let Some(storage) = cli.storage {
        config.storage_path = storage;
    }
    let parallelism = parse_parallelism(cli.parallel.as_deref());

    let client = LocalDriveClient::open(&config.storage_path)
        .await
        .with_context(|| format!("Failed to open drive at {}", config.storage_path.display()))?;
    let codec = FfmpegCodec::from_config(&config).context("Failed to set up media codec")?;
    let thumbnailer = ThumbnailGenerator::new(Arc::new(codec));
    let orchestrator =
        BatchOrchestrator::from_config(Arc::new(client), Arc::new(thumbnailer), &config);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if let Some(line) = format_event(&event) {
                println!("{}", line);
            }
        }
    });

    let options = RunOptions {
        skip_duplicates: cli.skip_duplicates || config.skip_duplicates,
        parallelism,
        events: Some(tx),
    };
    let result = orchestrator.run(&folder, options).await;
    // The sender went away with the options, so the printer drains and exits.
    let _ = printer.await;

    let summary = result.with_context(|| format!("Upload of {} aborted", folder.display()))?;
    print!("{}", format_summary(&summary, &config.audit_dir));

    Ok(())
}
