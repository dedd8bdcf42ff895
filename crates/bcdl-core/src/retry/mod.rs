//! Timeout-driven retry policy for download jobs.
//!
//! Slow server-side preparation is expected and is handled by waiting longer:
//! a timed-out attempt is retried with a linearly larger timeout. Structural
//! failures (bad page, missing selector, invalid session) are final.

mod classify;
mod error;
mod policy;

pub use classify::{classify, ErrorKind};
pub use error::JobError;
pub use policy::{RetryPolicy, TimeoutDecision};
