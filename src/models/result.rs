use serde::{Deserialize, Serialize};

/// Outcome of a single source-file/voice conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemStatus {
    Success,
    /// Anything other than `"success"` on the wire (the backend sends `"failed"`)
    Failure,
}

impl From<String> for ItemStatus {
    fn from(value: String) -> Self {
        if value == "success" {
            ItemStatus::Success
        } else {
            ItemStatus::Failure
        }
    }
}

impl From<ItemStatus> for String {
    fn from(status: ItemStatus) -> Self {
        match status {
            ItemStatus::Success => "success".to_string(),
            ItemStatus::Failure => "failed".to_string(),
        }
    }
}

/// One entry of the `results` list in a completed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    /// Name of the source audio file
    pub source_file: String,
    /// Label of the target voice
    pub voice_name: String,
    /// Path of the written output (absent for failed items)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,
    /// Output size in megabytes (absent for failed items)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size_mb: Option<f64>,
    pub status: ItemStatus,
    /// Failure detail from the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        self.status == ItemStatus::Success
    }
}

/// Terminal payload of a completed job.
///
/// Deserialized in one piece from the `result` field of the `completed`
/// frame; a payload missing any required field is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub success_count: u64,
    pub failed_count: u64,
    pub total_files: u64,
    pub total_conversions: u64,
    pub total_time_minutes: f64,
    pub output_directory: String,
    pub results: Vec<ConversionOutcome>,
    /// Archive name offered for download (upload mode only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_filename: Option<String>,
    /// Archive size in megabytes (upload mode only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size_mb: Option<f64>,
}

impl ResultSummary {
    /// Number of conversions the backend attempted. Saturates on absurd
    /// wire counts.
    pub fn attempted(&self) -> u64 {
        self.success_count.saturating_add(self.failed_count)
    }

    /// Fraction of attempted conversions that succeeded, `None` if nothing ran.
    pub fn success_rate(&self) -> Option<f64> {
        match self.attempted() {
            0 => None,
            attempted => Some(self.success_count as f64 / attempted as f64),
        }
    }

    /// True if at least one conversion failed.
    pub fn is_partial_failure(&self) -> bool {
        self.failed_count > 0
    }

    /// Per-item outcomes that failed, in backend order.
    pub fn failures(&self) -> impl Iterator<Item = &ConversionOutcome> {
        self.results.iter().filter(|r| !r.is_success())
    }
}
