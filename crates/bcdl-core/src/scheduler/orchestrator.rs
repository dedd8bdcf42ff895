//! Page-batch orchestration: one worker-pool run per pagination step.
//!
//! The collection page reveals more albums each time it is paged, and the
//! revealed list is cumulative. Every step therefore re-lists everything
//! visible so far, drops what the history already holds, runs the rest to
//! completion and checkpoints the history before paging again. Nothing from
//! step `i + 1` starts before every job of step `i` has reported.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::EngineConfig;
use crate::driver::{Entry, PageDriver};
use crate::history::HistoryStore;
use crate::job::Job;
use crate::options::DownloadOptions;

use super::error::RunError;
use super::events::DownloadEvents;
use super::pool::WorkerPool;
use super::summary::RunSummary;

/// Drives a whole download run against one page driver.
pub struct Orchestrator {
    driver: Arc<dyn PageDriver>,
    options: DownloadOptions,
    config: EngineConfig,
}

impl Orchestrator {
    pub fn new(
        driver: Arc<dyn PageDriver>,
        options: DownloadOptions,
        config: EngineConfig,
    ) -> Self {
        Self {
            driver,
            options,
            config,
        }
    }

    pub fn options(&self) -> &DownloadOptions {
        &self.options
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run to completion on the current tokio runtime.
    ///
    /// Only setup, history and listing failures are returned as errors;
    /// per-album failures are reported through `events` and counted in the
    /// summary.
    pub async fn run(&self, events: &dyn DownloadEvents) -> Result<RunSummary, RunError> {
        let opts = &self.options;
        create_dir(&opts.output_dir).await?;
        create_dir(&opts.state_dir()).await?;
        let mut history = HistoryStore::open(opts.history_path())?;

        tracing::info!(
            user = %opts.user.username,
            format = %opts.file_type,
            filter = %opts.filter,
            output = %opts.output_dir.display(),
            history = history.len(),
            "starting download run"
        );

        let driver = &self.driver;
        driver
            .apply_filter(&opts.filter)
            .await
            .map_err(listing_failed)?;
        let total_count = driver.total_count().await.map_err(listing_failed)?;
        let mut steps = driver.pagination_steps().await.map_err(listing_failed)?;
        if steps == 0 && total_count > 0 {
            // Everything fits on the first page.
            steps = 1;
        }
        tracing::info!(total_count, steps, "collection listed");

        let mut summary = RunSummary {
            total_count,
            ..RunSummary::default()
        };
        let mut sighted: HashSet<String> = HashSet::new();

        for step in 1..=steps {
            let visible = driver
                .current_entries(&opts.filter)
                .await
                .map_err(listing_failed)?;
            let visible_count = visible.len();
            let batch = self.select_batch(visible, &history, &mut sighted, events, &mut summary);
            tracing::info!(
                step,
                steps,
                visible = visible_count,
                queued = batch.len(),
                "processing pagination step"
            );

            self.run_batch(batch, &mut history, events, &mut summary)
                .await?;
            history.flush()?;
            summary.steps = step;

            if step < steps {
                driver.advance_page().await.map_err(listing_failed)?;
            }
        }

        history.flush()?;
        tracing::info!(
            downloaded = summary.downloaded,
            failed = summary.failed,
            skipped = summary.skipped,
            "download run complete"
        );
        events.on_complete(&summary);
        Ok(summary)
    }

    /// Run to completion on a private multi-threaded runtime.
    ///
    /// Must not be called from inside a tokio runtime.
    pub fn run_blocking(&self, events: &dyn DownloadEvents) -> Result<RunSummary, RunError> {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(RunError::Runtime)?;
        rt.block_on(self.run(events))
    }

    /// Entries of this window that still need downloading, in listing order.
    fn select_batch(
        &self,
        visible: Vec<Entry>,
        history: &HistoryStore,
        sighted: &mut HashSet<String>,
        events: &dyn DownloadEvents,
        summary: &mut RunSummary,
    ) -> Vec<Entry> {
        let file_type = self.options.file_type;
        let mut in_window: HashSet<String> = HashSet::new();
        let mut batch = Vec::new();

        for entry in visible {
            let first_sighting = sighted.insert(entry.title.clone());
            if history.contains(&entry.title, file_type) {
                if first_sighting {
                    summary.skipped += 1;
                    events.on_skip(&entry);
                }
                continue;
            }
            if !in_window.insert(entry.title.clone()) {
                tracing::debug!(album = %entry.title, "duplicate title in listing, ignoring");
                continue;
            }
            batch.push(entry);
        }
        batch
    }

    /// Run one window's jobs through a fresh pool and record the results.
    async fn run_batch(
        &self,
        batch: Vec<Entry>,
        history: &mut HistoryStore,
        events: &dyn DownloadEvents,
        summary: &mut RunSummary,
    ) -> Result<(), RunError> {
        let expected = batch.len();
        if expected == 0 {
            return Ok(());
        }

        // Both queues hold the whole batch: enqueueing never waits on the
        // pool, and retries never touch the intake.
        let (jobs_tx, jobs_rx) = mpsc::channel::<Job>(expected);
        let (results_tx, mut results_rx) = mpsc::channel::<Job>(expected);
        let pool = WorkerPool::new(
            Arc::clone(&self.driver),
            self.options.output_dir.clone(),
            self.config.workers,
            self.config.retry,
        );
        let handle = tokio::spawn(pool.run(jobs_rx, results_tx));

        for entry in batch {
            events.on_start(&entry);
            let job = Job::new(entry, self.options.file_type, &self.config.retry);
            if jobs_tx.send(job).await.is_err() {
                return Err(RunError::PoolStopped {
                    expected,
                    received: 0,
                });
            }
        }
        drop(jobs_tx);
        summary.enqueued += expected;

        let mut received = 0;
        while received < expected {
            let Some(job) = results_rx.recv().await else {
                return Err(RunError::PoolStopped { expected, received });
            };
            received += 1;

            let file_type = job.file_type;
            let (entry, outcome) = job.into_parts();
            match outcome {
                Ok(path) => {
                    history.record(&entry.title, file_type);
                    summary.downloaded += 1;
                    events.on_success(&entry, &path);
                }
                Err(err) => {
                    summary.failed += 1;
                    events.on_failure(&entry, &err);
                }
            }
        }

        match handle.await {
            Ok(stats) => tracing::debug!(
                attempts = stats.attempts,
                retries = stats.retries,
                "pagination step drained"
            ),
            Err(e) => tracing::error!("worker pool task failed: {}", e),
        }
        Ok(())
    }
}

fn listing_failed(e: crate::driver::DriverError) -> RunError {
    tracing::error!("could not get collection listing: {}", e);
    RunError::from_listing(e)
}

async fn create_dir(path: &Path) -> Result<(), RunError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| RunError::CreateDir {
            path: path.to_path_buf(),
            source,
        })
}
