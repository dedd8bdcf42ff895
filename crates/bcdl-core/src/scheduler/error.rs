//! Errors that abort a whole run.

use std::path::PathBuf;

use crate::driver::DriverError;
use crate::history::HistoryError;

/// Run-level failure. Per-album failures never show up here; they are
/// reported through `DownloadEvents::on_failure`.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// The output or bookkeeping directory could not be created.
    #[error("could not create directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The download history could not be opened or checkpointed.
    #[error("download history unavailable: {0}")]
    History(#[from] HistoryError),
    /// No authenticated browsing session.
    #[error("could not establish a browsing session: {0}")]
    Session(#[source] DriverError),
    /// Filtering, listing or paging the collection failed.
    #[error("could not get your collection: {0}. Check that you have the correct identity cookie value")]
    Listing(#[source] DriverError),
    /// The worker pool stopped before reporting every job of a step.
    #[error("worker pool stopped after {received} of {expected} results")]
    PoolStopped { expected: usize, received: usize },
    /// The blocking entry point could not start an async runtime.
    #[error("could not start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl RunError {
    /// Map a driver error from a listing call; session failures keep their own kind.
    pub(super) fn from_listing(e: DriverError) -> Self {
        match e {
            DriverError::Session(_) => RunError::Session(e),
            other => RunError::Listing(other),
        }
    }
}
