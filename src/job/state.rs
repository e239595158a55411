//! Job state owned by the progress reducer.
//!
//! Fields are only written by [`reduce`](super::reduce), which keeps the
//! phase/payload pairing consistent: a result exists only when completed,
//! an error message only when failed.

use crate::models::ResultSummary;
use crate::sse::ProgressEvent;

/// Lifecycle of one job run. Only moves forward:
/// `Idle -> Running -> {Completed | Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No event received yet
    #[default]
    Idle,
    Running,
    Completed,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Completed | Phase::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Running => "running",
            Phase::Completed => "completed",
            Phase::Failed => "failed",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current state of a job, as seen by the client.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobState {
    pub(super) last_event: Option<ProgressEvent>,
    pub(super) phase: Phase,
    pub(super) error_message: Option<String>,
    pub(super) final_result: Option<ResultSummary>,
    /// Number of events applied so far
    pub(super) applied: u64,
}

impl JobState {
    /// Fresh state before any event arrives.
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recently applied event.
    pub fn last_event(&self) -> Option<&ProgressEvent> {
        self.last_event.as_ref()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Failure message; set if and only if the phase is `Failed`.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Result summary; set if and only if the phase is `Completed`.
    pub fn final_result(&self) -> Option<&ResultSummary> {
        self.final_result.as_ref()
    }

    /// Raw progress of the last event, unclamped.
    pub fn progress(&self) -> Option<i64> {
        self.last_event.as_ref().and_then(|e| e.progress)
    }

    /// Number of events that changed this state.
    pub fn applied_events(&self) -> u64 {
        self.applied
    }
}
