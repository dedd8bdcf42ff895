pub mod config;
pub mod logging;

// Engine
pub mod driver;
pub mod filename;
pub mod format;
pub mod history;
pub mod job;
pub mod options;
pub mod retry;
pub mod scheduler;
