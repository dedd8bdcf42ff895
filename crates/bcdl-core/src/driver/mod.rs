//! Page driver boundary: everything that touches the storefront's pages.
//!
//! The engine never navigates, clicks or saves by itself. A `PageDriver`
//! owns the collection listing (filter, paging, visible entries) and hands out
//! one `EntryPage` per download attempt; the pool releases that page on every
//! exit path.

mod error;
mod manifest;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::format::FileType;

pub use error::DriverError;
pub use manifest::{Manifest, ManifestDriver, ManifestEntry};

/// Opaque reference a driver uses to reach an entry's download page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator(String);

impl Locator {
    pub fn new(s: impl Into<String>) -> Self {
        Locator(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One purchased item as listed in the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub locator: Locator,
}

impl Entry {
    pub fn new(title: impl Into<String>, locator: Locator) -> Self {
        Self {
            title: title.into(),
            locator,
        }
    }
}

/// Collection listing and page factory.
///
/// Listing calls are made only by the orchestrator, one at a time;
/// `open_entry` is called concurrently from pool attempts.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Narrow the collection listing to items matching `filter` (empty = all).
    async fn apply_filter(&self, filter: &str) -> Result<(), DriverError>;

    /// Number of items matching the current filter.
    async fn total_count(&self) -> Result<usize, DriverError>;

    /// How many pagination steps reveal the whole filtered collection.
    async fn pagination_steps(&self) -> Result<usize, DriverError>;

    /// Entries currently visible in the listing, in collection order.
    async fn current_entries(&self, filter: &str) -> Result<Vec<Entry>, DriverError>;

    /// Reveal the next window of the listing.
    async fn advance_page(&self) -> Result<(), DriverError>;

    /// Allocate a fresh page for one download attempt of `entry`.
    async fn open_entry(&self, entry: &Entry) -> Result<Box<dyn EntryPage>, DriverError>;
}

/// A page dedicated to one download attempt.
#[async_trait]
pub trait EntryPage: Send {
    /// Load the entry's download page.
    async fn navigate(&mut self) -> Result<(), DriverError>;

    /// Pick the encoding in the page's format selector.
    async fn select_format(&mut self, file_type: FileType) -> Result<(), DriverError>;

    /// Trigger the download and save it into `output_dir` under the server's
    /// suggested name. `prepare_timeout` bounds how long to wait for the
    /// server to prepare the file, not the transfer itself.
    async fn download(
        &mut self,
        output_dir: &Path,
        prepare_timeout: Duration,
    ) -> Result<PathBuf, DriverError>;

    /// Close the page. Must not fail; drivers log their own close errors.
    async fn release(self: Box<Self>);
}
