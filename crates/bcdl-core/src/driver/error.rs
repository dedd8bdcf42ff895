//! Errors reported across the page driver boundary.

/// Failure of one driver call.
///
/// Only `PrepareTimeout` is recoverable by waiting longer; every other
/// variant describes something a retry will not fix.
#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    /// The browsing context or session could not be established.
    #[error("session: {0}")]
    Session(String),
    /// Collection listing, filtering or paging failed.
    #[error("listing: {0}")]
    Listing(String),
    /// Opening or loading an entry's page failed.
    #[error("navigation: {0}")]
    Navigation(String),
    /// An expected page element was missing.
    #[error("selector not found: {0}")]
    SelectorNotFound(String),
    /// The entry does not offer the requested format.
    #[error("format {0} not offered")]
    FormatUnavailable(crate::format::FileType),
    /// The server did not finish preparing the file in time.
    #[error("download not prepared within {0:?}")]
    PrepareTimeout(std::time::Duration),
    /// The output name is already taken by another album's download.
    #[error("{} was already written for '{owner}'", path.display())]
    NameConflict {
        path: std::path::PathBuf,
        owner: String,
    },
    /// Saving the transferred file failed.
    #[error("save download: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Other(String),
}

impl DriverError {
    /// True when the error says "too slow", as opposed to "broken".
    pub fn is_timeout(&self) -> bool {
        matches!(self, DriverError::PrepareTimeout(_))
    }
}
