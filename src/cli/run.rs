//! Command dispatch for the leivo CLI.

use std::future::Future;
use std::process::ExitCode;

use bytes::Bytes;
use color_eyre::Result;
use futures::Stream;
use tracing::{info, warn};

use super::args::{CliCommand, USAGE};
use super::version::version_line;
use crate::cli_output::{
    icons, print_cancelled, print_completed, print_connection_lost, print_failed, print_header,
    print_models, print_progress, print_step_line,
};
use crate::client::LeivoClient;
use crate::config::ClientConfig;
use crate::error::LeivoError;
use crate::job::{JobOutcome, JobRunner};
use crate::models::{BatchRequest, UploadRequest};
use crate::traits::HttpError;

/// Execute a parsed command against the configured server.
pub async fn run_command(command: CliCommand, config: ClientConfig) -> Result<ExitCode> {
    match command {
        CliCommand::Version => {
            println!("{}", version_line());
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(ExitCode::SUCCESS)
        }
        CliCommand::Health => {
            let client = LeivoClient::new(config)?;
            match client.health_check().await {
                Ok(true) => {
                    let message = format!("Server is up at {}", client.config().base_url);
                    print_step_line(icons::SUCCESS, &message);
                    Ok(ExitCode::SUCCESS)
                }
                Ok(false) => {
                    print_step_line(icons::WARNING, "Server answered but is not healthy");
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => Ok(report_error(&e)),
            }
        }
        CliCommand::Models => {
            let client = LeivoClient::new(config)?;
            match client.list_models().await {
                Ok(models) => {
                    print_models(&models);
                    Ok(ExitCode::SUCCESS)
                }
                Err(e) => Ok(report_error(&e)),
            }
        }
        CliCommand::Batch {
            model,
            source,
            output,
        } => {
            let client = LeivoClient::new(config)?;
            let mut request = BatchRequest::new(model, source);
            if let Some(output) = output {
                request = request.with_output_directory(output);
            }

            print_header(&format!("BATCH CONVERSION: {}", request.model_name));
            match client.start_batch(&request).await {
                Ok(stream) => Ok(report_outcome(&drain_job(stream, ctrl_c()).await)),
                Err(e) => Ok(report_error(&e)),
            }
        }
        CliCommand::Upload {
            clone_data,
            source_audio,
            voice_ids,
        } => {
            let client = LeivoClient::new(config)?;
            let request = match UploadRequest::from_paths(&clone_data, &source_audio, voice_ids).await {
                Ok(request) => request,
                Err(e) => return Ok(report_error(&LeivoError::from(e))),
            };

            print_header(&format!("UPLOAD CONVERSION: {}", request.source_audio.file_name));
            match client.start_upload(&request).await {
                Ok(stream) => Ok(report_outcome(&drain_job(stream, ctrl_c()).await)),
                Err(e) => Ok(report_error(&e)),
            }
        }
    }
}

/// Drain a job stream, printing a line for each new snapshot.
pub async fn drain_job<S, C>(stream: S, cancel: C) -> JobOutcome
where
    S: Stream<Item = Result<Bytes, HttpError>> + Unpin,
    C: Future<Output = ()>,
{
    let mut runner = JobRunner::new();
    let mut rx = runner.subscribe();

    let printer = tokio::spawn(async move {
        while let Some(state) = rx.recv().await {
            print_progress(&state);
        }
    });

    let outcome = runner.run_until(stream, cancel).await;

    // Dropping the runner closes the channel; the printer drains what is queued
    drop(runner);
    if let Err(e) = printer.await {
        warn!(error = %e, "Progress printer task failed");
    }
    outcome
}

/// Print the final outcome and map it to an exit code.
pub fn report_outcome(outcome: &JobOutcome) -> ExitCode {
    match outcome {
        JobOutcome::Completed(result) => print_completed(result),
        JobOutcome::Failed(message) => print_failed(message),
        JobOutcome::ConnectionLost(err) => {
            warn!(code = err.error_code(), error = %err, "Job stream lost");
            print_connection_lost(err)
        }
        JobOutcome::Cancelled => print_cancelled(),
    }

    if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn report_error(err: &LeivoError) -> ExitCode {
    warn!(code = err.error_code(), error = %err, "Request failed");
    print_step_line(icons::FAILURE, &err.user_message());
    ExitCode::FAILURE
}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, cancelling"),
        Err(e) => {
            warn!(error = %e, "Could not listen for Ctrl-C");
            std::future::pending::<()>().await
        }
    }
}
