//! Job progress stream decoding
//!
//! The conversion service answers a job submission with one streamed
//! response body made of `data: <json>\n` frames (a restricted SSE framing:
//! no `event:`/`id:` fields, no retry directive). Blank lines between frames
//! are keep-alives.
//!
//! # Module structure
//! - `reader` - byte chunks to lines (FrameReader, LineBuffer)
//! - `events` - typed event definitions (ProgressEvent, EventKind, FrameOutcome)
//! - `payloads` - internal lenient payload deserialization
//! - `parser` - line to event parsing (parse_frame, parse_event)

mod events;
mod parser;
mod payloads;
mod reader;

// Re-export public types
pub use events::{
    EventKind, FrameOutcome, Milestone, ProgressCounters, ProgressEvent, SseParseError,
    STEP_COMPLETED, STEP_ERROR,
};
pub use parser::{frame_payload, parse_event, parse_frame, DATA_PREFIX};
pub use reader::{FrameReader, LineBuffer};
