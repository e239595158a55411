use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::CloneData;

/// Request body for `POST /api/convert/batch` (server-side model registry).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BatchRequest {
    /// Registered model name
    pub model_name: String,
    /// Directory on the server holding the source WAV files
    pub source_audio_directory: String,
    /// Output root on the server; the backend default applies when omitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_directory: Option<String>,
}

impl BatchRequest {
    pub fn new(model_name: impl Into<String>, source_audio_directory: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            source_audio_directory: source_audio_directory.into(),
            output_directory: None,
        }
    }

    pub fn with_output_directory(mut self, output_directory: impl Into<String>) -> Self {
        self.output_directory = Some(output_directory.into());
        self
    }
}

/// A file attached to a multipart upload.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadFile {
    pub file_name: String,
    pub mime_type: String,
    pub content: Bytes,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, content: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            content,
        }
    }

    /// Read a file from disk, naming the part after the file.
    pub async fn read(path: &Path, mime_type: &str) -> std::io::Result<Self> {
        let content = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, mime_type, Bytes::from(content)))
    }
}

/// Request for `POST /api/convert/upload` (direct file upload).
#[derive(Debug, Clone, PartialEq)]
pub struct UploadRequest {
    /// Clone-data JSON describing the available voices
    pub clone_data: UploadFile,
    /// Source audio to convert
    pub source_audio: UploadFile,
    /// Voices to convert into
    pub voice_ids: Vec<String>,
}

impl UploadRequest {
    /// Load both files from disk.
    ///
    /// When `voice_ids` is empty every voice listed in the clone-data file is
    /// selected.
    pub async fn from_paths(
        clone_data: &Path,
        source_audio: &Path,
        voice_ids: Vec<String>,
    ) -> Result<Self, UploadRequestError> {
        let clone_data = UploadFile::read(clone_data, "application/json")
            .await
            .map_err(|e| UploadRequestError::Read(clone_data.to_path_buf(), e))?;
        let source_audio = UploadFile::read(source_audio, "audio/wav")
            .await
            .map_err(|e| UploadRequestError::Read(source_audio.to_path_buf(), e))?;

        let voice_ids = if voice_ids.is_empty() {
            CloneData::from_slice(&clone_data.content)
                .map_err(UploadRequestError::InvalidCloneData)?
                .voice_ids()
        } else {
            voice_ids
        };

        if voice_ids.is_empty() {
            return Err(UploadRequestError::NoVoices);
        }

        Ok(Self {
            clone_data,
            source_audio,
            voice_ids,
        })
    }

    /// `voice_ids` as the JSON array string the form field carries.
    pub fn voice_ids_field(&self) -> String {
        serde_json::Value::from(self.voice_ids.clone()).to_string()
    }
}

/// Why an upload request could not be assembled.
#[derive(Debug, thiserror::Error)]
pub enum UploadRequestError {
    #[error("failed to read {}: {1}", .0.display())]
    Read(PathBuf, #[source] std::io::Error),

    #[error("clone data is not valid JSON: {0}")]
    InvalidCloneData(#[source] serde_json::Error),

    #[error("no voice selected and the clone data lists none")]
    NoVoices,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_batch_request_serialization() {
        let request = BatchRequest::new("Alice", "/data/src");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model_name"], "Alice");
        assert_eq!(json["source_audio_directory"], "/data/src");
        assert!(json.get("output_directory").is_none());

        let request = request.with_output_directory("/data/out");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["output_directory"], "/data/out");
    }

    #[test]
    fn test_voice_ids_field_is_json_array() {
        let request = UploadRequest {
            clone_data: UploadFile::new("c.json", "application/json", Bytes::new()),
            source_audio: UploadFile::new("s.wav", "audio/wav", Bytes::new()),
            voice_ids: vec!["v1".to_string(), "v2".to_string()],
        };
        assert_eq!(request.voice_ids_field(), r#"["v1","v2"]"#);
    }

    #[tokio::test]
    async fn test_from_paths_selects_all_voices_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let clone_path = dir.path().join("clone.json");
        let audio_path = dir.path().join("source.wav");
        std::fs::File::create(&clone_path)
            .unwrap()
            .write_all(br#"{"voices": [{"voice_id": "a", "name": "A"}, {"voice_id": "b", "name": "B"}]}"#)
            .unwrap();
        std::fs::write(&audio_path, b"RIFF....WAVE").unwrap();

        let request = UploadRequest::from_paths(&clone_path, &audio_path, vec![])
            .await
            .unwrap();
        assert_eq!(request.voice_ids, vec!["a", "b"]);
        assert_eq!(request.source_audio.file_name, "source.wav");
        assert_eq!(request.source_audio.mime_type, "audio/wav");
        assert_eq!(request.source_audio.content, Bytes::from_static(b"RIFF....WAVE"));
    }

    #[tokio::test]
    async fn test_from_paths_explicit_voices_win() {
        let dir = tempfile::tempdir().unwrap();
        let clone_path = dir.path().join("clone.json");
        let audio_path = dir.path().join("source.wav");
        std::fs::write(&clone_path, br#"{"voices": [{"voice_id": "a"}]}"#).unwrap();
        std::fs::write(&audio_path, b"wav").unwrap();

        let request = UploadRequest::from_paths(&clone_path, &audio_path, vec!["z".to_string()])
            .await
            .unwrap();
        assert_eq!(request.voice_ids, vec!["z"]);
    }

    #[tokio::test]
    async fn test_from_paths_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = UploadRequest::from_paths(
            &dir.path().join("nope.json"),
            &dir.path().join("nope.wav"),
            vec![],
        )
        .await;
        assert!(matches!(result, Err(UploadRequestError::Read(..))));
    }

    #[tokio::test]
    async fn test_from_paths_no_voices() {
        let dir = tempfile::tempdir().unwrap();
        let clone_path = dir.path().join("clone.json");
        let audio_path = dir.path().join("source.wav");
        std::fs::write(&clone_path, br#"{"voices": []}"#).unwrap();
        std::fs::write(&audio_path, b"wav").unwrap();

        let result = UploadRequest::from_paths(&clone_path, &audio_path, vec![]).await;
        assert!(matches!(result, Err(UploadRequestError::NoVoices)));
    }
}
