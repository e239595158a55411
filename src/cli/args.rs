//! Command-line argument parsing for the leivo CLI.
//!
//! This module handles parsing command-line arguments and determining
//! which CLI command to execute.

use std::path::PathBuf;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Check the server is reachable
    Health,
    /// List registered voice models
    Models,
    /// Convert a server-side directory with a registered model
    Batch {
        model: String,
        source: String,
        output: Option<String>,
    },
    /// Upload clone data and one source file
    Upload {
        clone_data: PathBuf,
        source_audio: PathBuf,
        /// Empty means every voice in the clone data
        voice_ids: Vec<String>,
    },
}

/// Why the command line could not be parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArgsError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("unknown option '{flag}' for '{command}'")]
    UnknownFlag { command: &'static str, flag: String },
    #[error("option '{0}' needs a value")]
    MissingValue(String),
    #[error("'{command}' requires {flag}")]
    MissingRequired {
        command: &'static str,
        flag: &'static str,
    },
}

/// Usage text printed for `--help` and on argument errors.
pub const USAGE: &str = "\
Usage:
  leivo health
  leivo models
  leivo batch --model NAME --source DIR [--output DIR]
  leivo upload --clone-data FILE --source-audio FILE [--voice ID]...
  leivo --version | --help";

/// Parse command-line arguments and return the appropriate command.
///
/// # Arguments
///
/// * `args` - Iterator of command-line arguments (typically `std::env::args()`)
///
/// # Examples
///
/// ```
/// use leivo::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["leivo".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), Ok(CliCommand::Version));
/// ```
pub fn parse_args<I>(args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let mut args = args.skip(1);

    let Some(command) = args.next() else {
        return Ok(CliCommand::Help);
    };

    match command.as_str() {
        "--version" | "-V" => Ok(CliCommand::Version),
        "--help" | "-h" | "help" => Ok(CliCommand::Help),
        "health" => Ok(CliCommand::Health),
        "models" => Ok(CliCommand::Models),
        "batch" => parse_batch(args),
        "upload" => parse_upload(args),
        _ => Err(ArgsError::UnknownCommand(command)),
    }
}

fn parse_batch<I>(mut args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut model = None;
    let mut source = None;
    let mut output = None;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--model" | "-m" => model = Some(value_for(&flag, &mut args)?),
            "--source" | "-s" => source = Some(value_for(&flag, &mut args)?),
            "--output" | "-o" => output = Some(value_for(&flag, &mut args)?),
            _ => {
                return Err(ArgsError::UnknownFlag {
                    command: "batch",
                    flag,
                })
            }
        }
    }

    Ok(CliCommand::Batch {
        model: model.ok_or(ArgsError::MissingRequired {
            command: "batch",
            flag: "--model",
        })?,
        source: source.ok_or(ArgsError::MissingRequired {
            command: "batch",
            flag: "--source",
        })?,
        output,
    })
}

fn parse_upload<I>(mut args: I) -> Result<CliCommand, ArgsError>
where
    I: Iterator<Item = String>,
{
    let mut clone_data = None;
    let mut source_audio = None;
    let mut voice_ids = Vec::new();

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--clone-data" => clone_data = Some(PathBuf::from(value_for(&flag, &mut args)?)),
            "--source-audio" => source_audio = Some(PathBuf::from(value_for(&flag, &mut args)?)),
            "--voice" => voice_ids.push(value_for(&flag, &mut args)?),
            _ => {
                return Err(ArgsError::UnknownFlag {
                    command: "upload",
                    flag,
                })
            }
        }
    }

    Ok(CliCommand::Upload {
        clone_data: clone_data.ok_or(ArgsError::MissingRequired {
            command: "upload",
            flag: "--clone-data",
        })?,
        source_audio: source_audio.ok_or(ArgsError::MissingRequired {
            command: "upload",
            flag: "--source-audio",
        })?,
        voice_ids,
    })
}

/// Take the value following `flag`. A following flag does not count.
fn value_for<I>(flag: &str, args: &mut I) -> Result<String, ArgsError>
where
    I: Iterator<Item = String>,
{
    match args.next() {
        Some(value) if !value.starts_with("--") => Ok(value),
        _ => Err(ArgsError::MissingValue(flag.to_string())),
    }
}
