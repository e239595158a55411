//! CLI output utilities.
//!
//! Line-based rendering of job progress and results. Progress goes to
//! stdout; logs go to stderr.

mod job;
mod lines;

pub use job::*;
pub use lines::*;
