//! Fixed-size pool of concurrent download attempts.
//!
//! Keeps up to `workers` attempts in flight at once; when one finishes, its
//! job is either reported or parked in the retry backlog, and the next queued
//! job is started until the intake is closed and everything has reported.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::task::JoinSet;

use crate::driver::PageDriver;
use crate::job::{AttemptOutcome, Job, Transition};
use crate::retry::RetryPolicy;

use super::attempt::run_attempt;

/// Counters for one pool run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Jobs taken from the intake queue.
    pub accepted: usize,
    /// Attempts started, retries included.
    pub attempts: usize,
    /// Timed-out attempts that were requeued.
    pub retries: usize,
    /// Terminal results sent.
    pub reported: usize,
}

/// Worker pool executing jobs against a page driver.
///
/// Retried jobs go to a pool-owned unbounded backlog, never back into the
/// intake queue, so the intake's capacity only has to fit the initial batch.
#[derive(Clone)]
pub struct WorkerPool {
    driver: Arc<dyn PageDriver>,
    output_dir: PathBuf,
    workers: usize,
    policy: RetryPolicy,
}

type AttemptSet = JoinSet<(Job, AttemptOutcome)>;

impl WorkerPool {
    pub fn new(
        driver: Arc<dyn PageDriver>,
        output_dir: PathBuf,
        workers: usize,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            driver,
            output_dir,
            workers: workers.max(1),
            policy,
        }
    }

    /// Drains `jobs_in` until it is closed and empty, sending exactly one
    /// terminal job per accepted job to `results_out`.
    ///
    /// Per-job failures travel inside the reported job; nothing is returned
    /// as an error.
    pub async fn run(
        self,
        mut jobs_in: mpsc::Receiver<Job>,
        results_out: mpsc::Sender<Job>,
    ) -> PoolStats {
        let mut stats = PoolStats::default();
        let mut backlog: VecDeque<Job> = VecDeque::new();
        let mut running = AttemptSet::new();
        let mut intake_open = true;

        loop {
            // Fill free slots: fresh jobs first, then retries.
            while running.len() < self.workers {
                let fresh = if intake_open {
                    match jobs_in.try_recv() {
                        Ok(job) => {
                            stats.accepted += 1;
                            Some(job)
                        }
                        Err(TryRecvError::Empty) => None,
                        Err(TryRecvError::Disconnected) => {
                            intake_open = false;
                            None
                        }
                    }
                } else {
                    None
                };
                let Some(job) = fresh.or_else(|| backlog.pop_front()) else {
                    break;
                };
                self.spawn_attempt(&mut running, job, &mut stats);
            }

            if running.is_empty() {
                // Slots were free and nothing was runnable, so the backlog is empty.
                if !intake_open {
                    break;
                }
                match jobs_in.recv().await {
                    Some(job) => {
                        stats.accepted += 1;
                        self.spawn_attempt(&mut running, job, &mut stats);
                    }
                    None => intake_open = false,
                }
                continue;
            }

            let has_slot = running.len() < self.workers;
            tokio::select! {
                joined = running.join_next() => {
                    let Some(joined) = joined else { continue };
                    match joined {
                        Ok((job, outcome)) => {
                            self.settle(job, outcome, &mut backlog, &results_out, &mut stats)
                                .await;
                        }
                        Err(e) => tracing::error!("download attempt task failed: {}", e),
                    }
                }
                next = jobs_in.recv(), if intake_open && has_slot => {
                    match next {
                        Some(job) => {
                            stats.accepted += 1;
                            self.spawn_attempt(&mut running, job, &mut stats);
                        }
                        None => intake_open = false,
                    }
                }
            }
        }

        tracing::debug!(
            accepted = stats.accepted,
            attempts = stats.attempts,
            retries = stats.retries,
            reported = stats.reported,
            "worker pool drained"
        );
        stats
    }

    fn spawn_attempt(&self, running: &mut AttemptSet, mut job: Job, stats: &mut PoolStats) {
        job.start();
        stats.attempts += 1;
        tracing::info!(
            album = %job.title(),
            attempt = job.attempts(),
            timeout_secs = job.timeout().as_secs(),
            "starting download attempt"
        );
        running.spawn(run_attempt(
            Arc::clone(&self.driver),
            self.output_dir.clone(),
            job,
        ));
    }

    async fn settle(
        &self,
        mut job: Job,
        outcome: AttemptOutcome,
        backlog: &mut VecDeque<Job>,
        results_out: &mpsc::Sender<Job>,
        stats: &mut PoolStats,
    ) {
        let timed_out = matches!(outcome, AttemptOutcome::TimedOut);
        match job.finish(outcome, &self.policy) {
            Transition::Requeue => {
                stats.retries += 1;
                tracing::warn!(
                    album = %job.title(),
                    retries = job.retries(),
                    next_timeout_secs = job.timeout().as_secs(),
                    "download timed out, retrying with longer timeout"
                );
                backlog.push_back(job);
            }
            Transition::Report => {
                if timed_out {
                    tracing::warn!(
                        album = %job.title(),
                        retries = job.retries(),
                        "giving up after maximum retries"
                    );
                }
                stats.reported += 1;
                if results_out.send(job).await.is_err() {
                    tracing::warn!("result receiver dropped; discarding job result");
                }
            }
        }
    }
}
