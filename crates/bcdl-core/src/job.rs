//! One download job and its timeout/retry state machine.
//!
//! ```text
//! pending ─▶ running ─┬─▶ succeeded
//!               ▲     ├─▶ failed
//!               │     └─▶ retrying ─┐
//!               └───────────────────┘
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::driver::Entry;
use crate::format::FileType;
use crate::retry::{classify, ErrorKind, JobError, RetryPolicy, TimeoutDecision};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Retrying,
    Succeeded,
    Failed,
}

impl JobState {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobState::Succeeded | JobState::Failed)
    }
}

/// What one attempt produced.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// The file was saved at this path.
    Saved(PathBuf),
    /// A driver step failed.
    Failed(JobError),
    /// The per-attempt deadline fired first.
    TimedOut,
}

/// What the pool must do with a job after an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Terminal: report it.
    Report,
    /// Retrying: queue it for another attempt.
    Requeue,
}

/// One album in one format, plus its retry bookkeeping.
#[derive(Debug)]
pub struct Job {
    pub entry: Entry,
    pub file_type: FileType,
    timeout: Duration,
    retries: u32,
    attempts: u32,
    state: JobState,
    outcome: Option<Result<PathBuf, JobError>>,
}

impl Job {
    pub fn new(entry: Entry, file_type: FileType, policy: &RetryPolicy) -> Self {
        Self {
            entry,
            file_type,
            timeout: policy.initial_timeout,
            retries: 0,
            attempts: 0,
            state: JobState::Pending,
            outcome: None,
        }
    }

    pub fn title(&self) -> &str {
        &self.entry.title
    }

    /// Deadline of the next (or current) attempt.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }

    /// Attempts started so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Terminal result; `None` until the job succeeded or failed.
    pub fn outcome(&self) -> Option<Result<&Path, &JobError>> {
        self.outcome.as_ref().map(|r| r.as_ref().map(PathBuf::as_path))
    }

    /// Split a job into its entry and terminal result. A job that never
    /// reached a terminal state yields [`JobError::Unfinished`].
    pub fn into_parts(self) -> (Entry, Result<PathBuf, JobError>) {
        let state = self.state;
        let result = self
            .outcome
            .unwrap_or(Err(JobError::Unfinished { state }));
        (self.entry, result)
    }

    /// Mark an attempt as started.
    pub fn start(&mut self) {
        debug_assert!(
            matches!(self.state, JobState::Pending | JobState::Retrying),
            "start() on {:?} job",
            self.state
        );
        self.state = JobState::Running;
        self.attempts += 1;
    }

    /// Apply the result of the running attempt.
    pub fn finish(&mut self, outcome: AttemptOutcome, policy: &RetryPolicy) -> Transition {
        debug_assert_eq!(self.state, JobState::Running, "finish() without start()");
        match outcome {
            AttemptOutcome::Saved(path) => self.succeed(path),
            AttemptOutcome::TimedOut => self.timed_out(policy),
            AttemptOutcome::Failed(err) => match classify(&err) {
                ErrorKind::Timeout => self.timed_out(policy),
                ErrorKind::Structural => self.fail(err),
            },
        }
    }

    fn succeed(&mut self, path: PathBuf) -> Transition {
        self.state = JobState::Succeeded;
        self.outcome = Some(Ok(path));
        Transition::Report
    }

    fn fail(&mut self, err: JobError) -> Transition {
        self.state = JobState::Failed;
        self.outcome = Some(Err(err));
        Transition::Report
    }

    fn timed_out(&mut self, policy: &RetryPolicy) -> Transition {
        match policy.on_timeout(self.retries, self.timeout) {
            TimeoutDecision::Retry { next_timeout } => {
                self.retries += 1;
                self.timeout = next_timeout;
                self.state = JobState::Retrying;
                Transition::Requeue
            }
            TimeoutDecision::GiveUp => self.fail(JobError::MaxRetriesExceeded {
                retries: self.retries,
                last_timeout: self.timeout,
            }),
        }
    }
}
