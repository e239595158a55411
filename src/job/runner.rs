//! Job stream drain.
//!
//! [`JobRunner`] reads a job's response body line by line, parses each line
//! and applies the resulting events to its [`ProgressReducer`] in arrival
//! order. Every applied event produces one snapshot, queued in order for
//! each subscriber so a presentation layer sees every milestone.

use std::future::Future;

use bytes::Bytes;
use futures::Stream;
use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use super::reducer::ProgressReducer;
use super::state::{JobState, Phase};
use crate::error::StreamError;
use crate::models::ResultSummary;
use crate::sse::{parse_frame, FrameOutcome, FrameReader};
use crate::traits::HttpError;

/// Longest slice of a bad frame echoed into the logs.
const LOG_PREVIEW_CHARS: usize = 120;

/// How a drain ended. Exactly one per job run.
#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// Backend finished and sent its result summary
    Completed(ResultSummary),
    /// Backend reported a failure (or completed without a result)
    Failed(String),
    /// The stream broke or ended before a terminal event
    ConnectionLost(StreamError),
    /// The caller abandoned the drain
    Cancelled,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Completed(_))
    }

    /// Outcome implied by a terminal state, `None` while the job runs.
    pub fn from_state(state: &JobState) -> Option<Self> {
        match state.phase() {
            Phase::Completed => state.final_result().cloned().map(JobOutcome::Completed),
            Phase::Failed => Some(JobOutcome::Failed(
                state.error_message().unwrap_or_default().to_string(),
            )),
            Phase::Idle | Phase::Running => None,
        }
    }
}

/// Drives one job run from its byte stream to a [`JobOutcome`].
#[derive(Debug)]
pub struct JobRunner {
    reducer: ProgressReducer,
    subscribers: Vec<mpsc::UnboundedSender<JobState>>,
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRunner {
    /// Create a runner for a new job.
    pub fn new() -> Self {
        Self {
            reducer: ProgressReducer::new(),
            subscribers: Vec::new(),
        }
    }

    /// Subscribe to state snapshots.
    ///
    /// The receiver gets one snapshot per event applied after this call, in
    /// order. It yields `None` once the runner is dropped. Use
    /// [`state`](Self::state) for the latest value.
    pub fn subscribe(&mut self) -> mpsc::UnboundedReceiver<JobState> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers.push(tx);
        rx
    }

    /// Current job state.
    pub fn state(&self) -> &JobState {
        self.reducer.state()
    }

    pub fn is_terminal(&self) -> bool {
        self.reducer.is_terminal()
    }

    /// Drain `stream` until the job reaches a terminal state or the stream
    /// ends.
    pub async fn run<S>(&mut self, stream: S) -> JobOutcome
    where
        S: Stream<Item = Result<Bytes, HttpError>> + Unpin,
    {
        self.run_until(stream, std::future::pending::<()>()).await
    }

    /// Like [`run`](Self::run), but stop as soon as `cancel` resolves.
    ///
    /// Cancellation is checked before every read; once it fires no further
    /// chunk is read and no further state change is published. Nothing is
    /// sent upstream.
    pub async fn run_until<S, C>(&mut self, stream: S, cancel: C) -> JobOutcome
    where
        S: Stream<Item = Result<Bytes, HttpError>> + Unpin,
        C: Future<Output = ()>,
    {
        if let Some(outcome) = JobOutcome::from_state(self.state()) {
            return outcome;
        }

        let mut reader = FrameReader::new(stream);
        tokio::pin!(cancel);

        loop {
            let line = tokio::select! {
                biased;
                _ = &mut cancel => {
                    info!(phase = %self.state().phase(), "Job drain cancelled");
                    return JobOutcome::Cancelled;
                }
                line = reader.next_line() => line,
            };

            match line {
                Ok(Some(line)) => {
                    if let Some(outcome) = self.handle_line(&line) {
                        return outcome;
                    }
                }
                Ok(None) => {
                    let last_step = self
                        .state()
                        .last_event()
                        .map(|e| e.step_name().to_string());
                    warn!(last_step = ?last_step, "Job stream ended before a terminal event");
                    return JobOutcome::ConnectionLost(StreamError::EndedWithoutCompletion {
                        last_step,
                    });
                }
                Err(e) => {
                    warn!(error = %e, "Job stream failed");
                    return JobOutcome::ConnectionLost(StreamError::ConnectionLost(e));
                }
            }
        }
    }

    /// Feed one line through the parser and reducer. Returns the outcome
    /// once the job is terminal.
    fn handle_line(&mut self, line: &str) -> Option<JobOutcome> {
        match parse_frame(line) {
            FrameOutcome::Event(event) => match self.reducer.try_apply(event) {
                Ok(state) => {
                    let snapshot = state.clone();
                    self.publish(snapshot);
                    JobOutcome::from_state(self.reducer.state())
                }
                Err(reason) => {
                    warn!(%reason, "Ignoring event after terminal state");
                    None
                }
            },
            FrameOutcome::Skip => {
                trace!(line = preview(line), "Skipping non-data line");
                None
            }
            FrameOutcome::Malformed(e) => {
                warn!(error = %e, frame = preview(line), "Skipping malformed frame");
                None
            }
        }
    }

    /// Queue a snapshot for every live subscriber, forgetting closed ones.
    fn publish(&mut self, snapshot: JobState) {
        self.subscribers.retain(|tx| tx.send(snapshot.clone()).is_ok());
    }

    /// Consume the runner, keeping the final state.
    pub fn into_state(self) -> JobState {
        debug!(applied = self.reducer.state().applied_events(), "Job runner finished");
        self.reducer.state().clone()
    }
}

fn preview(line: &str) -> &str {
    match line.char_indices().nth(LOG_PREVIEW_CHARS) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sse::Milestone;
    use futures::stream;
    use futures::StreamExt;

    const FIVE_RESULTS: &str = r#"[
        {"source_file": "1.wav", "voice_name": "V", "output_file": "/out/1.wav", "file_size_mb": 1.0, "status": "success"},
        {"source_file": "2.wav", "voice_name": "V", "output_file": "/out/2.wav", "file_size_mb": 1.0, "status": "success"},
        {"source_file": "3.wav", "voice_name": "V", "output_file": "/out/3.wav", "file_size_mb": 1.0, "status": "success"},
        {"source_file": "4.wav", "voice_name": "V", "output_file": "/out/4.wav", "file_size_mb": 1.0, "status": "success"},
        {"source_file": "5.wav", "voice_name": "V", "output_file": "/out/5.wav", "file_size_mb": 1.0, "status": "success"}
    ]"#;

    fn completed_frame() -> String {
        let results: serde_json::Value = serde_json::from_str(FIVE_RESULTS).unwrap();
        let frame = serde_json::json!({
            "step": "completed",
            "message": "done",
            "progress": 100,
            "result": {
                "success_count": 5,
                "failed_count": 0,
                "total_files": 5,
                "total_conversions": 5,
                "total_time_minutes": 2.5,
                "output_directory": "/out",
                "results": results
            }
        });
        format!("data: {}\n\n", frame)
    }

    fn byte_stream(chunks: Vec<String>) -> impl Stream<Item = Result<Bytes, HttpError>> + Unpin {
        stream::iter(
            chunks
                .into_iter()
                .map(|c| Ok(Bytes::from(c)))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn test_happy_path_reaches_completed() {
        let body = format!(
            "{}{}{}",
            "data: {\"step\":\"files_loaded\",\"message\":\"5 files\",\"progress\":10,\"file_count\":5}\n\n",
            "data: {\"step\":\"converting\",\"message\":\"3.wav\",\"progress\":55,\"file_index\":3,\"total_files\":5}\n\n",
            completed_frame()
        );
        let mut runner = JobRunner::new();
        let outcome = runner.run(byte_stream(vec![body])).await;

        let JobOutcome::Completed(result) = outcome else {
            panic!("expected completion, got {:?}", outcome);
        };
        assert_eq!(result.success_count, 5);
        assert_eq!(result.results.len(), 5);
        assert_eq!(runner.state().phase(), Phase::Completed);
        assert_eq!(runner.state().final_result(), Some(&result));
        assert_eq!(runner.state().applied_events(), 3);
    }

    #[tokio::test]
    async fn test_immediate_error() {
        let mut runner = JobRunner::new();
        let outcome = runner
            .run(byte_stream(vec![
                "data: {\"step\":\"error\",\"message\":\"model not found\",\"progress\":0}\n\n".to_string(),
            ]))
            .await;
        assert_eq!(outcome, JobOutcome::Failed("model not found".to_string()));
        assert_eq!(runner.state().phase(), Phase::Failed);
        assert_eq!(runner.state().error_message(), Some("model not found"));
        assert!(runner.state().final_result().is_none());
    }

    #[tokio::test]
    async fn test_end_of_stream_without_terminal_is_connection_lost() {
        let mut runner = JobRunner::new();
        let outcome = runner
            .run(byte_stream(vec![
                "data: {\"step\":\"initializing\",\"progress\":0}\n\n".to_string(),
                "data: {\"step\":\"converting\",\"progress\":30}\n\n".to_string(),
            ]))
            .await;
        assert_eq!(
            outcome,
            JobOutcome::ConnectionLost(StreamError::EndedWithoutCompletion {
                last_step: Some("converting".to_string()),
            })
        );
        assert_eq!(runner.state().phase(), Phase::Running);
    }

    #[tokio::test]
    async fn test_transport_error_is_connection_lost() {
        let items = vec![
            Ok(Bytes::from_static(b"data: {\"step\":\"converting\",\"progress\":30}\n")),
            Err(HttpError::Io("connection reset".to_string())),
        ];
        let mut runner = JobRunner::new();
        let outcome = runner.run(stream::iter(items)).await;
        assert_eq!(
            outcome,
            JobOutcome::ConnectionLost(StreamError::ConnectionLost(HttpError::Io(
                "connection reset".to_string()
            )))
        );
        assert_eq!(runner.state().phase(), Phase::Running);
    }

    #[tokio::test]
    async fn test_malformed_frame_skipped() {
        let body = format!("data: {{not valid json\n{}", completed_frame());
        let mut runner = JobRunner::new();
        let outcome = runner.run(byte_stream(vec![body])).await;
        assert!(outcome.is_success());
        assert_eq!(runner.state().applied_events(), 1);
    }

    #[tokio::test]
    async fn test_non_data_lines_do_not_change_state() {
        let mut runner = JobRunner::new();
        let mut rx = runner.subscribe();
        let outcome = runner
            .run(byte_stream(vec![
                ": keep-alive\n\nevent: progress\nid: 7\nretry: 100\n".to_string(),
            ]))
            .await;
        assert_eq!(
            outcome,
            JobOutcome::ConnectionLost(StreamError::EndedWithoutCompletion { last_step: None })
        );
        assert_eq!(runner.state(), &JobState::new());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_frames_split_across_chunks() {
        let body = format!(
            "data: {{\"step\":\"model_loaded\",\"message\":\"2個のVoiceモデルを読み込み\",\"voice_count\":2,\"progress\":5}}\n\n{}",
            completed_frame()
        );
        let bytes = body.into_bytes();
        let chunks: Vec<Result<Bytes, HttpError>> = bytes
            .chunks(3)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();

        let mut runner = JobRunner::new();
        let mut rx = runner.subscribe();
        let outcome = runner.run(stream::iter(chunks)).await;
        assert!(outcome.is_success());
        drop(runner);

        let mut phases = Vec::new();
        while let Some(snapshot) = rx.recv().await {
            phases.push(snapshot.phase());
        }
        assert_eq!(phases, vec![Phase::Running, Phase::Completed]);
    }

    #[tokio::test]
    async fn test_subscriber_sees_every_snapshot_from_one_chunk() {
        let body = concat!(
            "data: {\"step\":\"initializing\",\"progress\":0}\n\n",
            "data: {\"step\":\"model_loaded\",\"progress\":5,\"voice_count\":2}\n\n",
            "data: {\"step\":\"files_loaded\",\"progress\":10,\"file_count\":3}\n\n",
            "data: {\"step\":\"error\",\"message\":\"disk full\"}\n\n",
        );
        let mut runner = JobRunner::new();
        let mut rx = runner.subscribe();
        let outcome = runner.run(byte_stream(vec![body.to_string()])).await;
        assert_eq!(outcome, JobOutcome::Failed("disk full".to_string()));
        drop(runner);

        let mut seen = Vec::new();
        while let Some(snapshot) = rx.recv().await {
            seen.push(snapshot);
        }
        let steps: Vec<&str> = seen
            .iter()
            .filter_map(|s| s.last_event().map(|e| e.step_name()))
            .collect();
        assert_eq!(steps, vec!["initializing", "model_loaded", "files_loaded", "error"]);
        let applied: Vec<u64> = seen.iter().map(|s| s.applied_events()).collect();
        assert_eq!(applied, vec![1, 2, 3, 4]);
        assert_eq!(
            seen[1].last_event().map(|e| e.kind.clone()),
            Some(crate::sse::EventKind::Progress(Milestone::ModelLoaded))
        );
        assert_eq!(seen[3].phase(), Phase::Failed);
    }

    #[tokio::test]
    async fn test_every_subscriber_gets_snapshots() {
        let mut runner = JobRunner::new();
        let mut first = runner.subscribe();
        let closed = runner.subscribe();
        drop(closed);
        let mut second = runner.subscribe();

        runner
            .run(byte_stream(vec![
                "data: {\"step\":\"initializing\"}\ndata: {\"step\":\"converting\"}\n".to_string(),
            ]))
            .await;

        for rx in [&mut first, &mut second] {
            assert_eq!(rx.try_recv().unwrap().applied_events(), 1);
            assert_eq!(rx.try_recv().unwrap().applied_events(), 2);
            assert!(rx.try_recv().is_err());
        }
        assert_eq!(runner.subscribers.len(), 2);
    }

    #[tokio::test]
    async fn test_stops_reading_after_terminal() {
        let items = vec![
            Ok(Bytes::from_static(b"data: {\"step\":\"error\",\"message\":\"quota\"}\n")),
            Ok(Bytes::from_static(b"data: {\"step\":\"converting\",\"progress\":99}\n")),
        ];
        let mut runner = JobRunner::new();
        let outcome = runner.run(stream::iter(items)).await;
        assert_eq!(outcome, JobOutcome::Failed("quota".to_string()));

        // A second drain on a terminal job does not touch the stream
        let again = runner
            .run(byte_stream(vec![completed_frame()]))
            .await;
        assert_eq!(again, JobOutcome::Failed("quota".to_string()));
        assert_eq!(runner.state().applied_events(), 1);
    }

    #[tokio::test]
    async fn test_post_terminal_frame_in_same_chunk_is_not_applied() {
        let body = format!(
            "{}data: {{\"step\":\"converting\",\"progress\":10}}\n",
            completed_frame()
        );
        let mut runner = JobRunner::new();
        let outcome = runner.run(byte_stream(vec![body])).await;
        assert!(outcome.is_success());
        assert_eq!(runner.state().phase(), Phase::Completed);
        assert_eq!(runner.state().progress(), Some(100));
    }

    #[tokio::test]
    async fn test_cancel_before_read() {
        let mut runner = JobRunner::new();
        let outcome = runner
            .run_until(byte_stream(vec![completed_frame()]), async {})
            .await;
        assert_eq!(outcome, JobOutcome::Cancelled);
        assert_eq!(runner.state(), &JobState::new());
    }

    #[tokio::test]
    async fn test_cancel_while_waiting_for_chunk() {
        let (cancel_tx, cancel_rx) = tokio::sync::oneshot::channel::<()>();
        let first = stream::iter(vec![Ok(Bytes::from_static(
            b"data: {\"step\":\"converting\",\"progress\":20}\n",
        ))]);
        let hanging = first.chain(stream::pending());

        let mut runner = JobRunner::new();
        let mut rx = runner.subscribe();
        let drain = runner.run_until(hanging, async {
            let _ = cancel_rx.await;
        });

        let watcher = async {
            let snapshot = rx.recv().await.unwrap();
            assert_eq!(snapshot.progress(), Some(20));
            cancel_tx.send(()).unwrap();
        };

        let (outcome, ()) = tokio::join!(drain, watcher);
        assert_eq!(outcome, JobOutcome::Cancelled);
        assert_eq!(runner.state().phase(), Phase::Running);
        assert_eq!(runner.state().applied_events(), 1);
    }

    #[tokio::test]
    async fn test_completed_without_result_is_failed_outcome() {
        let mut runner = JobRunner::new();
        let outcome = runner
            .run(byte_stream(vec![
                "data: {\"step\":\"completed\",\"progress\":100}\n".to_string(),
            ]))
            .await;
        assert_eq!(
            outcome,
            JobOutcome::Failed(crate::job::COMPLETED_WITHOUT_RESULT.to_string())
        );
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let long = "変".repeat(200);
        assert_eq!(preview(&long).chars().count(), LOG_PREVIEW_CHARS);
        assert_eq!(preview("short"), "short");
    }
}
