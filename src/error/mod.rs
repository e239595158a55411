//! Error handling for the leivo client.
//!
//! The error taxonomy follows how a job run can end:
//!
//! | Condition | Where it surfaces |
//! |-----------|-------------------|
//! | Transport failure, stream ends early | [`StreamError`] via `JobOutcome::ConnectionLost` |
//! | Malformed frame | logged and skipped, never an error |
//! | Protocol violation | logged; reported through the job state |
//! | Backend `error` step | `Phase::Failed` with the backend message |
//!
//! Request-level failures (server unreachable, non-2xx status, bad upload
//! files) are [`LeivoError`]s returned before any frame is read.

mod leivo_error;
mod result;
mod stream;

// Re-export all public types
pub use leivo_error::LeivoError;
pub use result::LeivoResult;
pub use stream::StreamError;
