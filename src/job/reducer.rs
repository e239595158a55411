//! Progress reducer: folds events into the current [`JobState`].

use tracing::{debug, error, warn};

use super::state::{JobState, Phase};
use crate::models::ResultSummary;
use crate::sse::{EventKind, ProgressEvent};

/// Error message recorded when the backend reports completion without a
/// usable result payload.
pub const COMPLETED_WITHOUT_RESULT: &str = "completed without result";

/// Why an event was not applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    /// The job already reached a terminal phase
    #[error("job is already {phase}; ignoring '{step}' event")]
    AlreadyTerminal { phase: Phase, step: String },
}

/// Compute the state that follows `state` after `event`.
///
/// Pure: `state` is never modified. Returns `Err` (and no new state) for an
/// event arriving after the job reached `Completed` or `Failed`.
pub fn reduce(state: &JobState, event: ProgressEvent) -> Result<JobState, RejectReason> {
    if state.phase.is_terminal() {
        return Err(RejectReason::AlreadyTerminal {
            phase: state.phase,
            step: event.step_name().to_string(),
        });
    }

    let mut next = state.clone();
    next.applied += 1;

    match &event.kind {
        EventKind::Progress(_) => {
            next.phase = Phase::Running;
        }
        EventKind::Error => {
            next.phase = Phase::Failed;
            next.error_message = Some(event.message.clone());
        }
        EventKind::Completed { result: Some(result) } => {
            next.phase = Phase::Completed;
            next.final_result = Some(result.clone());
        }
        EventKind::Completed { result: None } => {
            next.phase = Phase::Failed;
            next.error_message = Some(COMPLETED_WITHOUT_RESULT.to_string());
        }
    }

    next.last_event = Some(event);
    Ok(next)
}

/// Owns the [`JobState`] of one job run and applies events to it in order.
#[derive(Debug, Default)]
pub struct ProgressReducer {
    state: JobState,
}

impl ProgressReducer {
    /// Create a reducer in the `Idle` phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event, returning the new state or why it was rejected.
    ///
    /// A rejected event leaves the state untouched.
    pub fn try_apply(&mut self, event: ProgressEvent) -> Result<&JobState, RejectReason> {
        let missing_result = matches!(event.kind, EventKind::Completed { result: None });
        let step = event.step_name().to_string();
        let progress = event.progress;

        self.state = reduce(&self.state, event)?;

        if missing_result {
            error!("Backend reported completion without a result; marking job as failed");
        }
        debug!(step = %step, progress = ?progress, phase = %self.state.phase, "Applied progress event");
        Ok(&self.state)
    }

    /// Apply an event and return the current state.
    ///
    /// Post-terminal events are logged and ignored.
    pub fn apply(&mut self, event: ProgressEvent) -> &JobState {
        if let Err(reason) = self.try_apply(event) {
            warn!(%reason, "Rejected event after terminal state");
        }
        &self.state
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Result summary once the job completed.
    pub fn result(&self) -> Option<&ResultSummary> {
        self.state.final_result()
    }

    /// Failure message once the job failed.
    pub fn error_message(&self) -> Option<&str> {
        self.state.error_message()
    }
}
