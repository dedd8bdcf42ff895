use std::time::Duration;

/// Decision taken when an attempt runs out of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutDecision {
    /// Requeue the job with this per-attempt timeout.
    Retry { next_timeout: Duration },
    /// Retry budget exhausted; fail the job.
    GiveUp,
}

/// Linear timeout backoff.
///
/// Attempt `n` (0-based retries) runs with
/// `initial_timeout + n * timeout_increment`. Lossless files take
/// proportionally longer to prepare, so the wait grows by a fixed step rather
/// than doubling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Timeouts retried before the job fails.
    pub max_retries: u32,
    /// Timeout of the first attempt.
    pub initial_timeout: Duration,
    /// Added after every timeout.
    pub timeout_increment: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_timeout: Duration::from_secs(4 * 60),
            timeout_increment: Duration::from_secs(2 * 60),
        }
    }
}

impl RetryPolicy {
    /// Decide what happens after an attempt with `retries` prior retries and
    /// timeout `current` timed out.
    pub fn on_timeout(&self, retries: u32, current: Duration) -> TimeoutDecision {
        if retries >= self.max_retries {
            return TimeoutDecision::GiveUp;
        }
        TimeoutDecision::Retry {
            next_timeout: current.saturating_add(self.timeout_increment),
        }
    }

    /// Timeout of the last attempt a job can make.
    pub fn final_timeout(&self) -> Duration {
        self.initial_timeout
            .saturating_add(self.timeout_increment.saturating_mul(self.max_retries))
    }
}
