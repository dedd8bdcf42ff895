//! Outcome counters for a whole run.

use std::fmt;

/// What a run did, reported to `on_complete` and returned by `run`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Items matching the filter, as reported by the driver.
    pub total_count: usize,
    /// Pagination steps processed.
    pub steps: usize,
    /// Jobs handed to the worker pool (an album failing in one step and
    /// re-surfacing in a later one counts twice).
    pub enqueued: usize,
    pub downloaded: usize,
    pub failed: usize,
    /// Distinct albums skipped because they were already in the history.
    pub skipped: usize,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} downloaded, {} failed, {} already downloaded ({} matching, {} steps)",
            self.downloaded, self.failed, self.skipped, self.total_count, self.steps
        )
    }
}
