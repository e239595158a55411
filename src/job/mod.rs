//! Job progress tracking
//!
//! # Module structure
//! - `state` - job phase and state snapshot (JobState, Phase)
//! - `reducer` - event application (reduce, ProgressReducer)
//! - `display` - derived presentation values (format_time, display_percent)
//! - `runner` - drains a byte stream into the reducer (JobRunner, JobOutcome)

mod display;
mod reducer;
mod runner;
mod state;

pub use display::{display_percent, format_time};
pub use reducer::{reduce, ProgressReducer, RejectReason, COMPLETED_WITHOUT_RESULT};
pub use runner::{JobOutcome, JobRunner};
pub use state::{JobState, Phase};
