//! Derived quantities for presenting a [`JobState`].
//!
//! Nothing here is stored; everything is computed from the raw state on read.

use super::state::JobState;

/// Format a duration in seconds as `m:ss`.
///
/// Negative and non-finite inputs format as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", total / 60, total % 60)
}

/// Clamp a raw progress value into `0..=100` for display.
pub fn display_percent(progress: i64) -> u8 {
    progress.clamp(0, 100) as u8
}

impl JobState {
    /// Progress for display, clamped to `0..=100`. `0` before any progress
    /// has been reported.
    pub fn display_percent(&self) -> u8 {
        self.progress().map(display_percent).unwrap_or(0)
    }

    /// Estimated time left as `m:ss`, if the backend reported one.
    pub fn remaining_time(&self) -> Option<String> {
        self.last_event()?
            .counters
            .estimated_remaining_seconds
            .map(format_time)
    }

    /// Time spent converting as `m:ss`, if the backend reported it.
    pub fn elapsed_time(&self) -> Option<String> {
        self.last_event()?.counters.elapsed_seconds.map(format_time)
    }

    /// Status message of the last event, if any.
    pub fn status_message(&self) -> Option<&str> {
        self.last_event()
            .map(|e| e.message.as_str())
            .filter(|m| !m.is_empty())
    }

    /// `(completed, total)` conversions, when both are known.
    pub fn conversions(&self) -> Option<(u64, u64)> {
        let counters = &self.last_event()?.counters;
        Some((counters.completed_conversions?, counters.total_conversions?))
    }

    /// `(index, total)` of the source file being converted.
    pub fn file_position(&self) -> Option<(u64, u64)> {
        let counters = &self.last_event()?.counters;
        Some((counters.file_index?, counters.total_files?))
    }

    /// `(index, total)` of the voice pattern being applied.
    pub fn voice_position(&self) -> Option<(u64, u64)> {
        let counters = &self.last_event()?.counters;
        Some((counters.voice_index?, counters.total_voices?))
    }

    /// Processing speed as `"12.3s/file"`.
    pub fn speed(&self) -> Option<String> {
        self.last_event()?
            .counters
            .speed_seconds_per_file
            .filter(|s| s.is_finite())
            .map(|s| format!("{:.1}s/file", s))
    }
}
