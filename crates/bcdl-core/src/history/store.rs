//! In-memory fingerprint set backed by a newline-delimited checkpoint file.

use std::collections::BTreeSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use super::error::HistoryError;
use super::fingerprint::{fingerprint, Fingerprint};
use crate::format::FileType;

/// Suffix of the scratch file a checkpoint is written to before the rename.
const TEMP_SUFFIX: &str = ".part";

/// Set of albums already downloaded, keyed by (title, format) fingerprint.
///
/// Only the orchestrator mutates a store, and only between pagination steps,
/// so it carries no interior locking.
#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    items: BTreeSet<Fingerprint>,
    dirty: bool,
}

impl HistoryStore {
    /// Open (or create) the history file at `path` and load every line.
    ///
    /// The parent directory must already exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, HistoryError> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|source| HistoryError::Open {
                path: path.clone(),
                source,
            })?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)
            .map_err(|source| HistoryError::Read {
                path: path.clone(),
                source,
            })?;

        // Lossy decoding: a line that is not one of our hex digests simply
        // never matches, it must not stop the run.
        let items: BTreeSet<Fingerprint> = bytes
            .split(|b| *b == b'\n')
            .filter_map(|line| Fingerprint::from_line(&String::from_utf8_lossy(line)))
            .collect();

        tracing::debug!(path = %path.display(), entries = items.len(), "loaded download history");

        Ok(Self {
            path,
            items,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, title: &str, file_type: FileType) -> bool {
        self.items.contains(&fingerprint(title, file_type))
    }

    pub fn contains_fingerprint(&self, fp: &Fingerprint) -> bool {
        self.items.contains(fp)
    }

    /// Record a completed download. Returns false if it was already present.
    pub fn record(&mut self, title: &str, file_type: FileType) -> bool {
        let inserted = self.items.insert(fingerprint(title, file_type));
        self.dirty |= inserted;
        inserted
    }

    /// Fingerprints in sorted order, as written to the file.
    pub fn iter(&self) -> impl Iterator<Item = &Fingerprint> {
        self.items.iter()
    }

    /// Checkpoint the full set to disk.
    ///
    /// Writes `<path>.part`, syncs it, then renames it over the history file,
    /// so an interrupted flush leaves the previous checkpoint intact. A no-op
    /// when nothing was recorded since the last flush.
    pub fn flush(&mut self) -> Result<(), HistoryError> {
        if !self.dirty {
            return Ok(());
        }

        let temp = temp_path(&self.path);
        let write_err = |source| HistoryError::Write {
            path: temp.clone(),
            source,
        };

        let file = File::create(&temp).map_err(write_err)?;
        let mut w = BufWriter::new(file);
        for fp in &self.items {
            writeln!(w, "{}", fp).map_err(write_err)?;
        }
        let file = w.into_inner().map_err(|e| write_err(e.into_error()))?;
        file.sync_all().map_err(write_err)?;
        drop(file);

        fs::rename(&temp, &self.path).map_err(|source| HistoryError::Write {
            path: self.path.clone(),
            source,
        })?;
        sync_parent_dir(&self.path);

        self.dirty = false;
        tracing::debug!(
            path = %self.path.display(),
            entries = self.items.len(),
            "history checkpoint written"
        );
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut o = path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Persist the rename itself. Best effort: the data is already synced.
#[cfg(unix)]
fn sync_parent_dir(path: &Path) {
    if let Some(parent) = path.parent() {
        if let Err(e) = File::open(parent).and_then(|d| d.sync_all()) {
            tracing::debug!(dir = %parent.display(), "could not sync history dir: {}", e);
        }
    }
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) {}
