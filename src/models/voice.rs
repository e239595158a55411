use serde::{Deserialize, Serialize};

use super::deserialize_nullable_string;

/// A single voice pattern inside a fine-tuned model or clone file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceInfo {
    pub voice_id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// A voice model available on the server-side registry (`GET /api/models`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceModel {
    pub model_name: String,
    #[serde(default)]
    pub fine_tune_id: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub voice_count: u32,
    #[serde(default)]
    pub voices: Vec<VoiceInfo>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub segment_count: Option<u32>,
    #[serde(default)]
    pub training_time_minutes: Option<f64>,
}

fn default_language() -> String {
    "ja".to_string()
}

/// Response body of `GET /api/models`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModelList {
    #[serde(default)]
    pub models: Vec<VoiceModel>,
}

/// Clone-data file as produced by the voice cloning step.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloneData {
    #[serde(default)]
    pub voices: Vec<VoiceInfo>,
}

impl CloneData {
    /// Parse a clone-data JSON document.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Every voice id in the file, in file order.
    pub fn voice_ids(&self) -> Vec<String> {
        self.voices.iter().map(|v| v.voice_id.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_list_deserialize() {
        let json = r#"{"models": [{
            "model_name": "Alice",
            "fine_tune_id": "ft-1",
            "language": "en",
            "voice_count": 2,
            "voices": [{"voice_id": "v1", "name": "Alice - Calm"}, {"voice_id": "v2", "name": null}],
            "created_at": "2025-05-01T10:00:00",
            "segment_count": 40,
            "training_time_minutes": 12.5
        }]}"#;
        let list: ModelList = serde_json::from_str(json).unwrap();
        assert_eq!(list.models.len(), 1);
        let model = &list.models[0];
        assert_eq!(model.model_name, "Alice");
        assert_eq!(model.voice_count, 2);
        assert_eq!(model.voices[0].name, "Alice - Calm");
        assert_eq!(model.voices[1].name, "");
        assert_eq!(model.training_time_minutes, Some(12.5));
    }

    #[test]
    fn test_model_defaults() {
        let json = r#"{"model_name": "Bob", "language": "ja", "voice_count": 0, "voices": [],
                       "fine_tune_id": null, "created_at": null, "segment_count": null,
                       "training_time_minutes": null}"#;
        let model: VoiceModel = serde_json::from_str(json).unwrap();
        assert_eq!(model.language, "ja");
        assert!(model.fine_tune_id.is_none());

        let minimal: VoiceModel = serde_json::from_str(r#"{"model_name": "Min"}"#).unwrap();
        assert_eq!(minimal.language, "ja");
        assert!(minimal.voices.is_empty());
    }

    #[test]
    fn test_clone_data_voice_ids() {
        let json = br#"{"model_name": "x", "voices": [
            {"voice_id": "a", "name": "A", "language": "ja"},
            {"voice_id": "b", "name": "B", "language": "ja"}
        ]}"#;
        let clone = CloneData::from_slice(json).unwrap();
        assert_eq!(clone.voice_ids(), vec!["a", "b"]);
    }

    #[test]
    fn test_clone_data_without_voices() {
        let clone = CloneData::from_slice(br#"{}"#).unwrap();
        assert!(clone.voice_ids().is_empty());
    }
}
