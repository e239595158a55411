//! Streaming-related error types.
//!
//! This module defines errors that end a job stream drain without a
//! terminal event from the backend.

use crate::traits::HttpError;

/// Stream-specific error variants.
///
/// These are transport-level outcomes, distinct from a backend-reported
/// failure (which arrives as an `error` frame and ends up in the job state).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StreamError {
    /// Reading the response body failed mid-stream.
    #[error("connection lost: {0}")]
    ConnectionLost(#[source] HttpError),

    /// The body ended before a `completed` or `error` frame.
    #[error("stream ended without completion")]
    EndedWithoutCompletion {
        /// Step of the last applied event, if any
        last_step: Option<String>,
    },
}

impl StreamError {
    /// Check if this error is likely transient and the job could be
    /// resubmitted.
    pub fn is_retryable(&self) -> bool {
        match self {
            StreamError::ConnectionLost(e) => e.is_retryable(),
            StreamError::EndedWithoutCompletion { .. } => true,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            StreamError::ConnectionLost(e) => {
                format!("Connection to the server was lost ({}).", e)
            }
            StreamError::EndedWithoutCompletion { last_step: Some(step) } => format!(
                "The server closed the connection during '{}' before the job finished.",
                step
            ),
            StreamError::EndedWithoutCompletion { last_step: None } => {
                "The server closed the connection before reporting any progress.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            StreamError::ConnectionLost(_) => "STREAM_CONNECTION_LOST",
            StreamError::EndedWithoutCompletion { .. } => "STREAM_ENDED_EARLY",
        }
    }
}
