//! Unified error type for the leivo client.
//!
//! Malformed frames and protocol violations never show up here; they are
//! recovered inside the pipeline and reported through the job state.
//! Stream drains report through `JobOutcome` instead.

use crate::models::UploadRequestError;
use crate::traits::HttpError;

/// Unified error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum LeivoError {
    /// Request could not be sent or the server rejected it.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// A non-streamed response body did not match the expected shape.
    #[error("unexpected response body: {0}")]
    Json(#[from] serde_json::Error),

    /// Upload files could not be prepared.
    #[error(transparent)]
    Upload(#[from] UploadRequestError),
}

impl LeivoError {
    /// Check if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            LeivoError::Http(err) => err.is_retryable(),
            LeivoError::Json(_) | LeivoError::Upload(_) => false,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            LeivoError::Http(HttpError::ConnectionFailed(_)) => {
                "Could not reach the conversion server. Is it running?".to_string()
            }
            LeivoError::Http(HttpError::ServerError { status, message }) => {
                format!("The server rejected the request ({}): {}", status, message)
            }
            LeivoError::Http(err) => err.to_string(),
            LeivoError::Json(err) => format!("The server sent an unexpected response: {}", err),
            LeivoError::Upload(err) => err.to_string(),
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            LeivoError::Http(_) => "HTTP",
            LeivoError::Json(_) => "JSON",
            LeivoError::Upload(_) => "UPLOAD",
        }
    }
}
