//! Offline driver over a JSON manifest of a collection.
//!
//! Behaves like the storefront's collection page: the listing is filtered by
//! title, only a growing window of `page_size` items per pagination step is
//! visible, and each album offers a set of formats. "Downloading" copies the
//! album's source file for the chosen format into the output directory.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::{DriverError, Entry, EntryPage, Locator, PageDriver};
use crate::filename::sanitize_filename;
use crate::format::FileType;

const LOCATOR_PREFIX: &str = "manifest:";

/// One album in a manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub title: String,
    /// Source file per offered format. Relative paths resolve against the
    /// manifest's directory.
    pub formats: HashMap<FileType, PathBuf>,
    /// Simulated server-side preparation time in milliseconds.
    #[serde(default)]
    pub prepare_ms: u64,
}

/// Collection description loaded from disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    pub entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Load a manifest and resolve its relative source paths.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("read manifest: {}", path.display()))?;
        let mut manifest: Manifest = serde_json::from_str(&data)
            .with_context(|| format!("parse manifest: {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for entry in &mut manifest.entries {
            for source in entry.formats.values_mut() {
                if source.is_relative() {
                    *source = base.join(&*source);
                }
            }
        }
        Ok(manifest)
    }
}

#[derive(Debug, Default)]
struct Listing {
    filter: String,
    /// Pagination steps revealed so far (at least one).
    revealed: usize,
}

/// Output files written during this run, keyed by path, with the album that owns each.
type Written = Arc<std::sync::Mutex<HashMap<PathBuf, String>>>;

/// [`PageDriver`] backed by a [`Manifest`].
pub struct ManifestDriver {
    entries: Vec<ManifestEntry>,
    page_size: usize,
    listing: Mutex<Listing>,
    written: Written,
    next_attempt: AtomicU64,
}

impl ManifestDriver {
    pub fn new(manifest: Manifest, page_size: usize) -> Self {
        Self {
            entries: manifest.entries,
            page_size: page_size.max(1),
            listing: Mutex::new(Listing {
                filter: String::new(),
                revealed: 1,
            }),
            written: Written::default(),
            next_attempt: AtomicU64::new(0),
        }
    }

    fn matching<'a>(&'a self, filter: &'a str) -> impl Iterator<Item = (usize, &'a ManifestEntry)> {
        let needle = filter.trim().to_lowercase();
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, e)| needle.is_empty() || e.title.to_lowercase().contains(&needle))
    }

    fn lookup(&self, locator: &Locator) -> Option<&ManifestEntry> {
        locator
            .as_str()
            .strip_prefix(LOCATOR_PREFIX)
            .and_then(|idx| idx.parse::<usize>().ok())
            .and_then(|idx| self.entries.get(idx))
    }
}

#[async_trait]
impl PageDriver for ManifestDriver {
    async fn apply_filter(&self, filter: &str) -> Result<(), DriverError> {
        let mut listing = self.listing.lock().await;
        listing.filter = filter.to_string();
        listing.revealed = 1;
        Ok(())
    }

    async fn total_count(&self) -> Result<usize, DriverError> {
        let listing = self.listing.lock().await;
        Ok(self.matching(&listing.filter).count())
    }

    async fn pagination_steps(&self) -> Result<usize, DriverError> {
        let total = self.total_count().await?;
        Ok(total.div_ceil(self.page_size))
    }

    async fn current_entries(&self, filter: &str) -> Result<Vec<Entry>, DriverError> {
        let listing = self.listing.lock().await;
        if listing.filter != filter {
            return Err(DriverError::Listing(format!(
                "listing is filtered by '{}', not '{}'",
                listing.filter, filter
            )));
        }
        let visible = listing.revealed.saturating_mul(self.page_size);
        Ok(self
            .matching(filter)
            .take(visible)
            .map(|(idx, e)| {
                let locator = Locator::new(format!("{LOCATOR_PREFIX}{idx}"));
                Entry::new(e.title.clone(), locator)
            })
            .collect())
    }

    async fn advance_page(&self) -> Result<(), DriverError> {
        let mut listing = self.listing.lock().await;
        listing.revealed += 1;
        Ok(())
    }

    async fn open_entry(&self, entry: &Entry) -> Result<Box<dyn EntryPage>, DriverError> {
        let album = self
            .lookup(&entry.locator)
            .ok_or_else(|| DriverError::Navigation(format!("no album at {}", entry.locator)))?;
        Ok(Box::new(ManifestPage {
            album: album.clone(),
            attempt: self.next_attempt.fetch_add(1, Ordering::Relaxed),
            written: Arc::clone(&self.written),
            loaded: false,
            selected: None,
        }))
    }
}

struct ManifestPage {
    album: ManifestEntry,
    /// Unique per opened page; keeps concurrent temp files apart.
    attempt: u64,
    written: Written,
    loaded: bool,
    selected: Option<FileType>,
}

impl ManifestPage {
    /// `<title>.<source extension>`, sanitized.
    fn suggested_name(&self, source: &Path) -> String {
        let name = match source.extension() {
            Some(ext) => format!("{}.{}", self.album.title, ext.to_string_lossy()),
            None => self.album.title.clone(),
        };
        sanitize_filename(&name)
    }

    /// Claim `path` for this album. Fails if another album already wrote it
    /// during this run.
    fn claim(&self, path: &Path) -> Result<(), DriverError> {
        let mut written = self.written.lock().unwrap_or_else(|e| e.into_inner());
        match written.get(path) {
            Some(owner) if *owner != self.album.title => Err(DriverError::NameConflict {
                path: path.to_path_buf(),
                owner: owner.clone(),
            }),
            Some(_) => Ok(()),
            None => {
                written.insert(path.to_path_buf(), self.album.title.clone());
                Ok(())
            }
        }
    }
}

#[async_trait]
impl EntryPage for ManifestPage {
    async fn navigate(&mut self) -> Result<(), DriverError> {
        self.loaded = true;
        Ok(())
    }

    async fn select_format(&mut self, file_type: FileType) -> Result<(), DriverError> {
        if !self.loaded {
            return Err(DriverError::SelectorNotFound("select#format-type".to_string()));
        }
        if !self.album.formats.contains_key(&file_type) {
            return Err(DriverError::FormatUnavailable(file_type));
        }
        self.selected = Some(file_type);
        Ok(())
    }

    async fn download(
        &mut self,
        output_dir: &Path,
        prepare_timeout: Duration,
    ) -> Result<PathBuf, DriverError> {
        let file_type = self
            .selected
            .ok_or_else(|| DriverError::SelectorNotFound(".download-button".to_string()))?;
        let source = self
            .album
            .formats
            .get(&file_type)
            .ok_or(DriverError::FormatUnavailable(file_type))?;

        let prepare = Duration::from_millis(self.album.prepare_ms);
        if prepare > prepare_timeout {
            tokio::time::sleep(prepare_timeout).await;
            return Err(DriverError::PrepareTimeout(prepare_timeout));
        }
        tokio::time::sleep(prepare).await;

        let final_path = output_dir.join(self.suggested_name(source));
        self.claim(&final_path)?;
        let mut temp = final_path.clone().into_os_string();
        temp.push(format!(".{}.part", self.attempt));
        let temp = PathBuf::from(temp);

        tokio::fs::copy(source, &temp).await?;
        tokio::fs::rename(&temp, &final_path).await?;
        Ok(final_path)
    }

    async fn release(self: Box<Self>) {}
}
