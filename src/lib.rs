//! leivo - client for a streaming voice conversion server
//!
//! Submits batch or upload conversion jobs and follows their progress
//! stream: bytes are split into lines ([`sse`]), lines are parsed into
//! progress events, and events are folded into a job state ([`job`]).
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod cli;
pub mod cli_output;
pub mod client;
pub mod config;
pub mod error;
pub mod job;
pub mod models;
pub mod sse;
pub mod traits;
