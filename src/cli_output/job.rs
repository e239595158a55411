//! Rendering of job state snapshots and outcomes.
//!
//! Formatting is kept separate from printing so the text can be tested.

use super::lines::{icons, print_details, print_footer, print_header, print_step_line};
use crate::error::StreamError;
use crate::job::JobState;
use crate::models::{ResultSummary, VoiceModel};

/// Number of cells in the progress bar.
const BAR_WIDTH: usize = 20;

/// Render a clamped percentage as a fixed-width bar.
pub fn progress_bar(percent: u8) -> String {
    let filled = (usize::from(percent.min(100)) * BAR_WIDTH) / 100;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// One status line for the current state, `None` before the first event.
///
/// ```text
/// [███████████░░░░░░░░░]  55% converting  file 3/5  voice 2/2  6/10  elapsed 1:15  eta 0:58  12.5s/file  b.wav
/// ```
pub fn format_progress_line(state: &JobState) -> Option<String> {
    let event = state.last_event()?;
    let percent = state.display_percent();
    let mut line = format!("{} {:>3}% {}", progress_bar(percent), percent, event.step_name());

    if let Some((index, total)) = state.file_position() {
        line.push_str(&format!("  file {}/{}", index, total));
    }
    if let Some((index, total)) = state.voice_position() {
        line.push_str(&format!("  voice {}/{}", index, total));
    }
    if let Some((done, total)) = state.conversions() {
        line.push_str(&format!("  {}/{}", done, total));
    }
    if let Some(elapsed) = state.elapsed_time() {
        line.push_str(&format!("  elapsed {}", elapsed));
    }
    if let Some(remaining) = state.remaining_time() {
        line.push_str(&format!("  eta {}", remaining));
    }
    if let Some(speed) = state.speed() {
        line.push_str("  ");
        line.push_str(&speed);
    }
    if let Some(message) = state.status_message() {
        line.push_str("  ");
        line.push_str(message);
    }
    Some(line)
}

/// Detail lines for a completed job.
pub fn format_summary(result: &ResultSummary) -> Vec<String> {
    let mut lines = Vec::new();

    let rate = result
        .success_rate()
        .map(|r| format!(" ({:.0}%)", r * 100.0))
        .unwrap_or_default();
    lines.push(format!(
        "Converted: {}/{}{}",
        result.success_count,
        result.attempted(),
        rate
    ));
    lines.push(format!("Files:     {}", result.total_files));
    lines.push(format!("Time:      {:.1} min", result.total_time_minutes));
    lines.push(format!("Output:    {}", result.output_directory));

    if let Some(name) = &result.download_filename {
        match result.file_size_mb {
            Some(size) => lines.push(format!("Archive:   {} ({:.1} MB)", name, size)),
            None => lines.push(format!("Archive:   {}", name)),
        }
    }

    for failure in result.failures() {
        lines.push(format!(
            "{} {} -> {}: {}",
            icons::FAILURE,
            failure.source_file,
            failure.voice_name,
            failure.error.as_deref().unwrap_or("unknown error")
        ));
    }

    lines
}

/// One line per registered model.
pub fn format_model_line(model: &VoiceModel) -> String {
    let voices: Vec<&str> = model
        .voices
        .iter()
        .map(|v| if v.name.is_empty() { v.voice_id.as_str() } else { v.name.as_str() })
        .collect();
    format!(
        "{} [{}] {} voice(s): {}",
        model.model_name,
        model.language,
        model.voice_count,
        voices.join(", ")
    )
}

/// Print the progress line for a snapshot, if there is one.
pub fn print_progress(state: &JobState) {
    if let Some(line) = format_progress_line(state) {
        print_step_line(icons::INFO, &line);
    }
}

pub fn print_completed(result: &ResultSummary) {
    if result.is_partial_failure() {
        print_header(&format!("{} CONVERSION COMPLETE (with failures)", icons::WARNING));
    } else {
        print_header(&format!("{} CONVERSION COMPLETE", icons::SUCCESS));
    }
    print_details(&format_summary(result));
    print_footer();
}

pub fn print_failed(message: &str) {
    print_header(&format!("{} CONVERSION FAILED", icons::FAILURE));
    print_details(&[message.to_string()]);
    print_footer();
}

/// Detail lines for a drain that lost its stream.
pub fn format_connection_lost(err: &StreamError) -> Vec<String> {
    let mut lines = vec![err.user_message()];
    if err.is_retryable() {
        lines.push("Submitting the job again may succeed.".to_string());
    }
    lines
}

pub fn print_connection_lost(err: &StreamError) {
    print_header(&format!("{} CONNECTION LOST", icons::FAILURE));
    print_details(&format_connection_lost(err));
    print_footer();
}

pub fn print_cancelled() {
    print_header(&format!("{} CANCELLED", icons::WARNING));
    print_details(&["Stopped reading progress. The server may still be converting.".to_string()]);
    print_footer();
}

pub fn print_models(models: &[VoiceModel]) {
    print_header("VOICE MODELS");
    if models.is_empty() {
        print_step_line(icons::INFO, "No models registered");
    }
    for model in models {
        print_step_line(icons::INFO, &format_model_line(model));
    }
    print_footer();
}
