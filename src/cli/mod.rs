//! CLI module for leivo.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - Command dispatch and job progress output
//!
//! # Usage
//!
//! ```ignore
//! use leivo::cli::{parse_args, run_command};
//! use leivo::config::ClientConfig;
//!
//! let command = parse_args(std::env::args())?;
//! let code = run_command(command, ClientConfig::from_env()).await?;
//! ```

pub mod args;
pub mod run;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, USAGE};
pub use run::{drain_job, report_outcome, run_command};
pub use version::{version_line, VERSION};
