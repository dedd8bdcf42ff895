//! Per-album and per-run notifications for the caller.

use std::path::Path;

use crate::driver::Entry;
use crate::retry::JobError;

use super::summary::RunSummary;

/// Callbacks fired by the orchestrator, always from its own task and in
/// order: `on_start` for every enqueued album, then exactly one of
/// `on_success`/`on_failure` for it, and `on_complete` once at the end.
pub trait DownloadEvents: Send + Sync {
    fn on_start(&self, _entry: &Entry) {}
    fn on_success(&self, _entry: &Entry, _saved_to: &Path) {}
    fn on_failure(&self, _entry: &Entry, _error: &JobError) {}
    /// The album is already in the download history.
    fn on_skip(&self, _entry: &Entry) {}
    fn on_complete(&self, _summary: &RunSummary) {}
}

/// Ignores every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopEvents;

impl DownloadEvents for NoopEvents {}

/// Reports every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogEvents;

impl DownloadEvents for LogEvents {
    fn on_start(&self, entry: &Entry) {
        tracing::info!("Beginning download: {}", entry.title);
    }

    fn on_success(&self, entry: &Entry, saved_to: &Path) {
        tracing::info!(path = %saved_to.display(), "Successfully downloaded: {}", entry.title);
    }

    fn on_failure(&self, entry: &Entry, error: &JobError) {
        tracing::warn!("Failed to download: {}: {}", entry.title, error);
    }

    fn on_skip(&self, entry: &Entry) {
        tracing::debug!("Already downloaded {}. Skipping", entry.title);
    }

    fn on_complete(&self, summary: &RunSummary) {
        tracing::info!("Downloads complete: {}", summary);
    }
}
