//! History file I/O errors.

use std::path::PathBuf;

/// Failure to open, read or checkpoint the history file.
///
/// Always fatal for a run: downloading without working dedup state would
/// repeat work the user already paid for in time and bandwidth.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("open history file {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("read history file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("write history file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
