//! Progress event types and definitions
//!
//! Contains the typed [`ProgressEvent`] decoded from one `data:` frame of the
//! job stream, and the [`FrameOutcome`] of parsing a single line.

use crate::models::ResultSummary;

/// Reserved step value for a backend-reported failure.
pub const STEP_ERROR: &str = "error";
/// Reserved step value for a finished job.
pub const STEP_COMPLETED: &str = "completed";

/// Non-terminal milestones reported while the job runs.
///
/// The backend's known milestones get their own variant; any other step name
/// is kept verbatim in [`Milestone::Other`] and treated the same way.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Milestone {
    Initializing,
    ModelLoaded,
    FilesLoaded,
    Converting,
    Other(String),
}

impl Milestone {
    pub fn as_str(&self) -> &str {
        match self {
            Milestone::Initializing => "initializing",
            Milestone::ModelLoaded => "model_loaded",
            Milestone::FilesLoaded => "files_loaded",
            Milestone::Converting => "converting",
            Milestone::Other(name) => name,
        }
    }
}

/// What a frame means for the job, keyed on its `step` field.
///
/// The two terminal arms are distinct variants, so the result payload can
/// only ever travel with a `completed` step.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Any non-terminal step
    Progress(Milestone),
    /// `step = "error"`
    Error,
    /// `step = "completed"`; `result` is `None` when the frame carried no
    /// usable result payload
    Completed { result: Option<ResultSummary> },
}

impl EventKind {
    /// Map a wire step name to its kind. `result` is only kept for
    /// `completed`.
    pub fn from_step(step: &str, result: Option<ResultSummary>) -> Self {
        match step {
            STEP_ERROR => EventKind::Error,
            STEP_COMPLETED => EventKind::Completed { result },
            "initializing" => EventKind::Progress(Milestone::Initializing),
            "model_loaded" => EventKind::Progress(Milestone::ModelLoaded),
            "files_loaded" => EventKind::Progress(Milestone::FilesLoaded),
            "converting" => EventKind::Progress(Milestone::Converting),
            other => EventKind::Progress(Milestone::Other(other.to_string())),
        }
    }

    /// The wire step name.
    pub fn step_name(&self) -> &str {
        match self {
            EventKind::Progress(milestone) => milestone.as_str(),
            EventKind::Error => STEP_ERROR,
            EventKind::Completed { .. } => STEP_COMPLETED,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, EventKind::Progress(_))
    }
}

/// Optional numeric counters a frame may carry.
///
/// Each field is independently absent when the backend omitted it or sent a
/// value of the wrong type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressCounters {
    /// Voices in the loaded model (sent with `model_loaded`)
    pub voice_count: Option<u64>,
    /// Source files discovered (sent with `files_loaded`)
    pub file_count: Option<u64>,
    pub file_index: Option<u64>,
    pub total_files: Option<u64>,
    pub voice_index: Option<u64>,
    pub total_voices: Option<u64>,
    pub completed_conversions: Option<u64>,
    pub total_conversions: Option<u64>,
    pub elapsed_seconds: Option<f64>,
    pub estimated_remaining_seconds: Option<f64>,
    pub speed_seconds_per_file: Option<f64>,
}

/// One decoded frame of the job stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressEvent {
    pub kind: EventKind,
    /// Human-readable status line (empty if the backend sent none)
    pub message: String,
    /// Raw progress as received; never clamped
    pub progress: Option<i64>,
    pub counters: ProgressCounters,
}

impl ProgressEvent {
    pub fn new(kind: EventKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            progress: None,
            counters: ProgressCounters::default(),
        }
    }

    pub fn with_progress(mut self, progress: i64) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_counters(mut self, counters: ProgressCounters) -> Self {
        self.counters = counters;
        self
    }

    pub fn step_name(&self) -> &str {
        self.kind.step_name()
    }

    pub fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }

    /// The result payload, only ever present on a `completed` event.
    pub fn result(&self) -> Option<&ResultSummary> {
        match &self.kind {
            EventKind::Completed { result } => result.as_ref(),
            _ => None,
        }
    }

    /// `completed_conversions / total_conversions`, when both are known and
    /// the total is non-zero.
    pub fn conversion_fraction(&self) -> Option<f64> {
        let done = self.counters.completed_conversions?;
        match self.counters.total_conversions? {
            0 => None,
            total => Some(done as f64 / total as f64),
        }
    }
}

/// Errors that make a `data:` frame unusable
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SseParseError {
    /// Payload is not valid JSON
    #[error("invalid JSON in data frame: {0}")]
    InvalidJson(String),
    /// Payload is JSON but not an object
    #[error("data frame is not a JSON object")]
    NotAnObject,
    /// Required `step` field absent or not a string
    #[error("data frame has no step")]
    MissingStep,
}

/// Result of parsing one line of the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// A usable progress event
    Event(ProgressEvent),
    /// Not an event frame (blank keep-alive, comment, anything else)
    Skip,
    /// Tagged as a data frame but unusable; log and continue
    Malformed(SseParseError),
}
