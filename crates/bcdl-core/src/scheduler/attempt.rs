//! One download attempt: open page, select format, download, release page.

use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::driver::{EntryPage, PageDriver};
use crate::job::{AttemptOutcome, Job};
use crate::retry::JobError;

/// Runs the job's current attempt under its deadline. The page, once opened,
/// is released on every exit path: success, driver error, deadline, panic.
pub(super) async fn run_attempt(
    driver: Arc<dyn PageDriver>,
    output_dir: PathBuf,
    job: Job,
) -> (Job, AttemptOutcome) {
    let deadline = job.timeout();
    let mut page: Option<Box<dyn EntryPage>> = None;

    let steps = AssertUnwindSafe(drive(
        driver.as_ref(),
        &job,
        &output_dir,
        deadline,
        &mut page,
    ))
    .catch_unwind();

    let outcome = match tokio::time::timeout(deadline, steps).await {
        Ok(Ok(Ok(path))) => AttemptOutcome::Saved(path),
        Ok(Ok(Err(e))) => AttemptOutcome::Failed(e),
        Ok(Err(_)) => {
            tracing::error!(album = %job.title(), "driver panicked during download attempt");
            AttemptOutcome::Failed(JobError::Panicked)
        }
        Err(_) => AttemptOutcome::TimedOut,
    };

    if let Some(page) = page.take() {
        if AssertUnwindSafe(page.release()).catch_unwind().await.is_err() {
            tracing::error!(album = %job.title(), "driver panicked while releasing page");
        }
    }

    (job, outcome)
}

async fn drive(
    driver: &dyn PageDriver,
    job: &Job,
    output_dir: &Path,
    prepare_timeout: Duration,
    slot: &mut Option<Box<dyn EntryPage>>,
) -> Result<PathBuf, JobError> {
    let opened = driver.open_entry(&job.entry).await.map_err(JobError::Open)?;
    let page = slot.insert(opened);
    page.navigate().await.map_err(JobError::Open)?;
    page.select_format(job.file_type)
        .await
        .map_err(JobError::SelectFormat)?;
    page.download(output_dir, prepare_timeout)
        .await
        .map_err(JobError::Download)
}
