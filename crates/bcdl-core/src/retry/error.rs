//! Terminal failure of a download job.

use std::time::Duration;

use crate::driver::DriverError;
use crate::job::JobState;

/// Why a job ended `failed`.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    /// The entry page could not be opened or loaded.
    #[error("could not open album page: {0}")]
    Open(#[source] DriverError),
    /// The requested format could not be selected.
    #[error("could not select file type: {0}")]
    SelectFormat(#[source] DriverError),
    /// Triggering or saving the download failed.
    #[error("could not download file: {0}")]
    Download(#[source] DriverError),
    /// Every allowed attempt timed out.
    #[error("maximum retries exceeded ({retries} retries, last timeout {last_timeout:?})")]
    MaxRetriesExceeded { retries: u32, last_timeout: Duration },
    /// The driver panicked during an attempt.
    #[error("download attempt panicked")]
    Panicked,
    /// The job was handed back before reaching a terminal state.
    #[error("download job ended while {state:?}")]
    Unfinished { state: JobState },
}

impl JobError {
    /// The driver error behind this failure, if any.
    pub fn driver_error(&self) -> Option<&DriverError> {
        match self {
            JobError::Open(e) | JobError::SelectFormat(e) | JobError::Download(e) => Some(e),
            JobError::MaxRetriesExceeded { .. }
            | JobError::Panicked
            | JobError::Unfinished { .. } => None,
        }
    }
}
