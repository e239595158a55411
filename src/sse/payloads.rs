//! Progress payload deserialization structs
//!
//! The backend's event shape is loosely typed. Every recognized field is
//! deserialized leniently: a value of the wrong type becomes `None` instead
//! of failing the whole frame, and unknown fields are ignored.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::sse::events::ProgressCounters;

/// Raw JSON payload of one `data:` frame.
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ProgressPayload {
    #[serde(default, deserialize_with = "lenient_string")]
    pub step: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub progress: Option<i64>,

    #[serde(default, deserialize_with = "lenient_u64")]
    pub voice_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub file_count: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub file_index: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_files: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub voice_index: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_voices: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub completed_conversions: Option<u64>,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub total_conversions: Option<u64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub elapsed_seconds: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub estimated_remaining_seconds: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub speed_seconds_per_file: Option<f64>,

    /// Kept raw; only a `completed` frame turns it into a `ResultSummary`
    #[serde(default)]
    pub result: Option<Value>,
}

impl ProgressPayload {
    pub(crate) fn counters(&self) -> ProgressCounters {
        ProgressCounters {
            voice_count: self.voice_count,
            file_count: self.file_count,
            file_index: self.file_index,
            total_files: self.total_files,
            voice_index: self.voice_index,
            total_voices: self.total_voices,
            completed_conversions: self.completed_conversions,
            total_conversions: self.total_conversions,
            elapsed_seconds: self.elapsed_seconds,
            estimated_remaining_seconds: self.estimated_remaining_seconds,
            speed_seconds_per_file: self.speed_seconds_per_file,
        }
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_f64(&Value::deserialize(deserializer)?))
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(n) = value.as_i64() {
        return Ok(Some(n));
    }
    Ok(coerce_f64(&value)
        .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
        .map(|f| f.trunc() as i64))
}

fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if let Some(n) = value.as_u64() {
        return Ok(Some(n));
    }
    Ok(coerce_f64(&value)
        .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f <= u64::MAX as f64)
        .map(|f| f as u64))
}

/// Numbers and numeric strings become `f64`; everything else is absent.
fn coerce_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|f| f.is_finite())
}
