//! CLI command handlers, one file per command.

mod fingerprint;
mod formats;
mod history;
mod run;

pub use fingerprint::run_fingerprint;
pub use formats::run_formats;
pub use history::run_history;
pub use run::{run_download, RunArgs};
