//! `bcdl run` – download the collection described by a manifest.

use anyhow::{Context, Result};
use bcdl_core::config;
use bcdl_core::driver::{Entry, Manifest, ManifestDriver};
use bcdl_core::format::FileType;
use bcdl_core::options::{DownloadOptions, User};
use bcdl_core::retry::JobError;
use bcdl_core::scheduler::{DownloadEvents, LogEvents, Orchestrator, RunSummary};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Arguments of `bcdl run`, as parsed.
#[derive(Debug)]
pub struct RunArgs {
    pub user: String,
    pub identity: String,
    pub output: PathBuf,
    pub format: Option<FileType>,
    pub filter: String,
    pub manifest: PathBuf,
    pub workers: Option<usize>,
}

/// Prints one line per album to stdout and mirrors everything to the log.
struct ConsoleEvents;

impl DownloadEvents for ConsoleEvents {
    fn on_start(&self, entry: &Entry) {
        LogEvents.on_start(entry);
        println!("Beginning download: {}", entry.title);
    }

    fn on_success(&self, entry: &Entry, saved_to: &Path) {
        LogEvents.on_success(entry, saved_to);
        println!("Successfully downloaded: {}", entry.title);
    }

    fn on_failure(&self, entry: &Entry, error: &JobError) {
        LogEvents.on_failure(entry, error);
        println!("Failed to download: {} ({})", entry.title, error);
    }

    fn on_skip(&self, entry: &Entry) {
        LogEvents.on_skip(entry);
    }

    fn on_complete(&self, summary: &RunSummary) {
        LogEvents.on_complete(summary);
        println!("Downloads complete: {}", summary);
    }
}

pub async fn run_download(args: RunArgs) -> Result<()> {
    let cfg = config::load_or_init()?;
    tracing::debug!("loaded config: {:?}", cfg);

    let mut engine = cfg.engine();
    if let Some(n) = args.workers {
        engine.workers = n.max(1);
    }
    let file_type = args.format.or(cfg.default_format).unwrap_or_default();

    let manifest = Manifest::load(&args.manifest)?;
    let driver = Arc::new(ManifestDriver::new(manifest, cfg.page_size));

    let options = DownloadOptions::new(User::new(args.user, args.identity), args.output, file_type)
        .with_filter(args.filter);
    println!(
        "Downloading {} to {} as {}",
        if options.filter.is_empty() {
            "collection".to_string()
        } else {
            format!("albums matching '{}'", options.filter)
        },
        options.output_dir.display(),
        file_type
    );

    let orchestrator = Orchestrator::new(driver, options, engine);
    let summary = orchestrator
        .run(&ConsoleEvents)
        .await
        .context("download run failed")?;

    if summary.failed > 0 {
        tracing::warn!("{} album(s) failed; rerun to retry them", summary.failed);
    }
    Ok(())
}
