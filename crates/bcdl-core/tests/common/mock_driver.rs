//! In-memory page driver with per-album scripted attempt behaviour.
//!
//! The listing reveals cumulative windows of `page_size` titles, like the
//! collection page's "view more". Every driver call that matters for ordering
//! is appended to the shared log: `advance:<n>`, `open:<title>`,
//! `downloaded:<title>`, `released:<title>`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bcdl_core::driver::{DriverError, Entry, EntryPage, Locator, PageDriver};
use bcdl_core::format::FileType;

use super::EventLog;

/// What one attempt of an album does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Save the file immediately.
    Ok,
    /// Never finish; only the attempt timeout ends it.
    Hang,
    /// The format selector is missing from the page.
    MissingSelector,
    /// The server never finishes preparing the file.
    PrepareTimeout,
}

pub struct MockDriver {
    titles: Vec<String>,
    page_size: usize,
    revealed: AtomicUsize,
    filter: Mutex<String>,
    /// Per-title attempt scripts; the last behaviour repeats.
    scripts: Mutex<HashMap<String, Vec<Behavior>>>,
    /// `current_entries` fails once this many steps are revealed.
    fail_listing_at: Option<usize>,
    opens: Mutex<HashMap<String, usize>>,
    log: EventLog,
}

impl MockDriver {
    pub fn new(titles: Vec<String>, page_size: usize) -> Self {
        Self {
            titles,
            page_size,
            revealed: AtomicUsize::new(1),
            filter: Mutex::new(String::new()),
            scripts: Mutex::new(HashMap::new()),
            fail_listing_at: None,
            opens: Mutex::new(HashMap::new()),
            log: EventLog::default(),
        }
    }

    pub fn script(self, title: &str, behaviors: &[Behavior]) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(title.to_string(), behaviors.to_vec());
        self
    }

    pub fn fail_listing_at(mut self, step: usize) -> Self {
        self.fail_listing_at = Some(step);
        self
    }

    pub fn log(&self) -> EventLog {
        Arc::clone(&self.log)
    }

    pub fn lines(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    /// Pages opened for `title` across all attempts.
    pub fn opens(&self, title: &str) -> usize {
        self.opens.lock().unwrap().get(title).copied().unwrap_or(0)
    }

    pub fn total_opens(&self) -> usize {
        self.opens.lock().unwrap().values().sum()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.lines().iter().filter(|l| l.starts_with(prefix)).count()
    }

    fn matching(&self) -> Vec<&String> {
        let needle = self.filter.lock().unwrap().to_lowercase();
        self.titles
            .iter()
            .filter(|t| t.to_lowercase().contains(&needle))
            .collect()
    }

    fn next_behavior(&self, title: &str) -> Behavior {
        let mut scripts = self.scripts.lock().unwrap();
        match scripts.get_mut(title) {
            Some(steps) if steps.len() > 1 => steps.remove(0),
            Some(steps) => steps[0],
            None => Behavior::Ok,
        }
    }

    fn push(&self, line: String) {
        self.log.lock().unwrap().push(line);
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn apply_filter(&self, filter: &str) -> Result<(), DriverError> {
        *self.filter.lock().unwrap() = filter.to_string();
        self.revealed.store(1, Ordering::SeqCst);
        Ok(())
    }

    async fn total_count(&self) -> Result<usize, DriverError> {
        Ok(self.matching().len())
    }

    async fn pagination_steps(&self) -> Result<usize, DriverError> {
        Ok(self.matching().len().div_ceil(self.page_size))
    }

    async fn current_entries(&self, _filter: &str) -> Result<Vec<Entry>, DriverError> {
        let revealed = self.revealed.load(Ordering::SeqCst);
        if self.fail_listing_at == Some(revealed) {
            return Err(DriverError::Listing("collection grid missing".to_string()));
        }
        Ok(self
            .matching()
            .into_iter()
            .take(revealed * self.page_size)
            .map(|t| Entry::new(t.clone(), Locator::new(format!("mock:{t}"))))
            .collect())
    }

    async fn advance_page(&self) -> Result<(), DriverError> {
        let revealed = self.revealed.fetch_add(1, Ordering::SeqCst) + 1;
        self.push(format!("advance:{revealed}"));
        Ok(())
    }

    async fn open_entry(&self, entry: &Entry) -> Result<Box<dyn EntryPage>, DriverError> {
        *self
            .opens
            .lock()
            .unwrap()
            .entry(entry.title.clone())
            .or_default() += 1;
        self.push(format!("open:{}", entry.title));
        Ok(Box::new(MockPage {
            title: entry.title.clone(),
            behavior: self.next_behavior(&entry.title),
            log: Arc::clone(&self.log),
        }))
    }
}

struct MockPage {
    title: String,
    behavior: Behavior,
    log: EventLog,
}

#[async_trait]
impl EntryPage for MockPage {
    async fn navigate(&mut self) -> Result<(), DriverError> {
        Ok(())
    }

    async fn select_format(&mut self, _file_type: FileType) -> Result<(), DriverError> {
        match self.behavior {
            Behavior::MissingSelector => Err(DriverError::SelectorNotFound(
                "select#format-type".to_string(),
            )),
            _ => Ok(()),
        }
    }

    async fn download(
        &mut self,
        output_dir: &Path,
        prepare_timeout: Duration,
    ) -> Result<PathBuf, DriverError> {
        match self.behavior {
            Behavior::Hang => std::future::pending().await,
            Behavior::PrepareTimeout => {
                tokio::time::sleep(prepare_timeout / 2).await;
                Err(DriverError::PrepareTimeout(prepare_timeout / 2))
            }
            Behavior::Ok | Behavior::MissingSelector => {
                let path = output_dir.join(format!("{}.zip", self.title));
                std::fs::write(&path, self.title.as_bytes())?;
                self.log
                    .lock()
                    .unwrap()
                    .push(format!("downloaded:{}", self.title));
                Ok(path)
            }
        }
    }

    async fn release(self: Box<Self>) {
        self.log
            .lock()
            .unwrap()
            .push(format!("released:{}", self.title));
    }
}
