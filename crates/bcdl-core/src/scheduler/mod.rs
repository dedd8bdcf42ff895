//! Download scheduling: the per-step worker pool and the pagination-driven
//! orchestrator that feeds it.
//!
//! Pipeline per pagination step:
//! listing window → history filter → job queue → worker pool → results →
//! history checkpoint → next page.

mod attempt;
mod error;
mod events;
mod orchestrator;
mod pool;
mod summary;

pub use error::RunError;
pub use events::{DownloadEvents, LogEvents, NoopEvents};
pub use orchestrator::Orchestrator;
pub use pool::{PoolStats, WorkerPool};
pub use summary::RunSummary;
