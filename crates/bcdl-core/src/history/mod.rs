//! Persistent download history: the dedup set that makes runs idempotent.
//!
//! One fingerprint per line in `<output_dir>/.bcdl/downloaded`. The file is
//! loaded whole at startup and rewritten as a checkpoint; it is never treated
//! as a transaction log, so duplicate or stray lines are harmless.

mod error;
mod fingerprint;
mod store;

pub use error::HistoryError;
pub use fingerprint::{fingerprint, Fingerprint};
pub use store::HistoryStore;
