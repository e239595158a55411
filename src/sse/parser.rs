//! Event parsing logic
//!
//! Turns one line of the job stream into a [`FrameOutcome`]. Only lines
//! starting with the literal `data: ` marker are frames; everything else is
//! skipped. A bad frame is reported as [`FrameOutcome::Malformed`] so the
//! caller can log it and keep reading.

use tracing::warn;

use crate::models::ResultSummary;
use crate::sse::events::{EventKind, FrameOutcome, ProgressEvent, SseParseError, STEP_COMPLETED};
use crate::sse::payloads::ProgressPayload;

/// Marker that tags a line as a data frame.
pub const DATA_PREFIX: &str = "data: ";

/// Extract the payload of a data frame, or `None` for any other line.
pub fn frame_payload(line: &str) -> Option<&str> {
    line.strip_prefix(DATA_PREFIX)
}

/// Parse a single line of the stream.
pub fn parse_frame(line: &str) -> FrameOutcome {
    match frame_payload(line) {
        Some(data) => match parse_event(data) {
            Ok(event) => FrameOutcome::Event(event),
            Err(e) => FrameOutcome::Malformed(e),
        },
        None => FrameOutcome::Skip,
    }
}

/// Parse the JSON payload of a data frame into a typed event.
pub fn parse_event(data: &str) -> Result<ProgressEvent, SseParseError> {
    let value: serde_json::Value =
        serde_json::from_str(data).map_err(|e| SseParseError::InvalidJson(e.to_string()))?;
    if !value.is_object() {
        return Err(SseParseError::NotAnObject);
    }

    let payload: ProgressPayload =
        serde_json::from_value(value).map_err(|e| SseParseError::InvalidJson(e.to_string()))?;
    let step = payload.step.as_deref().ok_or(SseParseError::MissingStep)?;

    let result = if step == STEP_COMPLETED {
        decode_result(payload.result.clone())
    } else {
        None
    };

    Ok(ProgressEvent {
        kind: EventKind::from_step(step, result),
        message: payload.message.clone().unwrap_or_default(),
        progress: payload.progress,
        counters: payload.counters(),
    })
}

/// A result that does not decode as a whole is dropped, never half-filled.
fn decode_result(raw: Option<serde_json::Value>) -> Option<ResultSummary> {
    match serde_json::from_value(raw?) {
        Ok(summary) => Some(summary),
        Err(e) => {
            warn!(error = %e, "Discarding undecodable result payload on completed frame");
            None
        }
    }
}
