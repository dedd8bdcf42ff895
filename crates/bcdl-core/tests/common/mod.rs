//! Shared fixtures: a scripted page driver and an event recorder that write
//! into one ordered log, so tests can assert how driver calls and engine
//! callbacks interleave.

#![allow(dead_code)]

pub mod mock_driver;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use bcdl_core::driver::Entry;
use bcdl_core::retry::JobError;
use bcdl_core::scheduler::{DownloadEvents, RunSummary};

pub use mock_driver::{Behavior, MockDriver};

/// Ordered log shared between a [`MockDriver`] and a [`RecordingEvents`].
pub type EventLog = Arc<Mutex<Vec<String>>>;

/// Records every engine callback into the shared log.
#[derive(Default)]
pub struct RecordingEvents {
    log: EventLog,
    errors: Mutex<HashMap<String, String>>,
    summaries: Mutex<Vec<RunSummary>>,
}

impl RecordingEvents {
    pub fn sharing(log: EventLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    fn push(&self, line: String) {
        self.log.lock().unwrap().push(line);
    }

    /// Error message of the failure reported for `title`, if any.
    pub fn error_for(&self, title: &str) -> Option<String> {
        self.errors.lock().unwrap().get(title).cloned()
    }

    pub fn completions(&self) -> Vec<RunSummary> {
        self.summaries.lock().unwrap().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.lines().iter().filter(|l| l.starts_with(prefix)).count()
    }
}

impl DownloadEvents for RecordingEvents {
    fn on_start(&self, entry: &Entry) {
        self.push(format!("start:{}", entry.title));
    }

    fn on_success(&self, entry: &Entry, _saved_to: &Path) {
        self.push(format!("success:{}", entry.title));
    }

    fn on_failure(&self, entry: &Entry, error: &JobError) {
        self.errors
            .lock()
            .unwrap()
            .insert(entry.title.clone(), error.to_string());
        self.push(format!("failure:{}", entry.title));
    }

    fn on_skip(&self, entry: &Entry) {
        self.push(format!("skip:{}", entry.title));
    }

    fn on_complete(&self, summary: &RunSummary) {
        self.summaries.lock().unwrap().push(*summary);
        self.push("complete".to_string());
    }
}

/// Titles "Album 00", "Album 01", ... in collection order.
pub fn albums(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Album {i:02}")).collect()
}

/// Position of the first log line equal to `line`.
pub fn position(lines: &[String], line: &str) -> Option<usize> {
    lines.iter().position(|l| l == line)
}
