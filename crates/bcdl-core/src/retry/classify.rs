//! Classify a failed attempt for the retry rule.

use super::error::JobError;

/// High-level classification of an attempt failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The attempt ran out of time; waiting longer may help.
    Timeout,
    /// Anything a retry will not fix.
    Structural,
}

/// Classify an attempt error. Only a driver-reported preparation timeout
/// counts as a timeout; the pool's own deadline is handled before this.
pub fn classify(e: &JobError) -> ErrorKind {
    match e.driver_error() {
        Some(de) if de.is_timeout() => ErrorKind::Timeout,
        _ => ErrorKind::Structural,
    }
}
