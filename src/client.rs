//! Conversion server API client.
//!
//! [`LeivoClient`] builds the requests for both submission modes and hands
//! back the raw response body as a [`ByteStream`]. Decoding that stream is
//! the job of [`JobRunner`](crate::job::JobRunner); both modes feed the same
//! pipeline.

use serde::Deserialize;
use tracing::{debug, info};

use crate::adapters::ReqwestHttpClient;
use crate::config::ClientConfig;
use crate::error::LeivoResult;
use crate::models::{BatchRequest, ModelList, UploadRequest, VoiceModel};
use crate::traits::{ByteStream, FormPart, Headers, HttpClient, HttpError, RequestBody, Response};

pub const HEALTH_PATH: &str = "/";
pub const MODELS_PATH: &str = "/api/models";
pub const BATCH_PATH: &str = "/api/convert/batch";
pub const UPLOAD_PATH: &str = "/api/convert/upload";

/// Body of `GET /`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// Client for the voice conversion server.
pub struct LeivoClient<C: HttpClient = ReqwestHttpClient> {
    config: ClientConfig,
    http: C,
}

impl LeivoClient<ReqwestHttpClient> {
    /// Create a client backed by reqwest.
    pub fn new(config: ClientConfig) -> LeivoResult<Self> {
        let http = ReqwestHttpClient::from_config(&config)?;
        Ok(Self { config, http })
    }
}

impl<C: HttpClient> LeivoClient<C> {
    /// Create a client over any [`HttpClient`] implementation.
    pub fn with_http_client(config: ClientConfig, http: C) -> Self {
        Self { config, http }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    /// Check the server is up.
    ///
    /// Returns `Ok(false)` when the server answers but does not report `ok`.
    pub async fn health_check(&self) -> LeivoResult<bool> {
        let response = self.get(HEALTH_PATH).await?;
        let health: HealthStatus = response.json()?;
        Ok(health.is_ok())
    }

    /// List the voice models in the server-side registry.
    pub async fn list_models(&self) -> LeivoResult<Vec<VoiceModel>> {
        let response = self.get(MODELS_PATH).await?;
        let list: ModelList = response.json()?;
        debug!(count = list.models.len(), "Fetched model list");
        Ok(list.models)
    }

    /// Submit a batch job against a registered model.
    ///
    /// The configured output directory is used when the request has none.
    pub async fn start_batch(&self, request: &BatchRequest) -> LeivoResult<ByteStream> {
        let mut request = request.clone();
        if request.output_directory.is_none() {
            if let Some(dir) = &self.config.output_directory {
                request.output_directory = Some(dir.to_string_lossy().into_owned());
            }
        }

        info!(
            model = %request.model_name,
            source = %request.source_audio_directory,
            "Submitting batch conversion"
        );
        let body = RequestBody::Json(serde_json::to_string(&request)?);
        self.post_stream(BATCH_PATH, body).await
    }

    /// Submit an upload job with clone data and a single source file.
    pub async fn start_upload(&self, request: &UploadRequest) -> LeivoResult<ByteStream> {
        info!(
            source = %request.source_audio.file_name,
            voices = request.voice_ids.len(),
            "Submitting upload conversion"
        );
        self.post_stream(UPLOAD_PATH, upload_body(request)).await
    }

    async fn get(&self, path: &str) -> LeivoResult<Response> {
        let url = self.config.endpoint(path);
        let response = self.http.get(&url, &Headers::new()).await?;
        if !response.is_success() {
            return Err(HttpError::ServerError {
                status: response.status,
                message: response
                    .text()
                    .unwrap_or_else(|_| "Unknown error".to_string()),
            }
            .into());
        }
        Ok(response)
    }

    async fn post_stream(&self, path: &str, body: RequestBody) -> LeivoResult<ByteStream> {
        let url = self.config.endpoint(path);
        let mut headers = Headers::new();
        headers.insert("Accept".to_string(), "text/event-stream".to_string());
        Ok(self.http.post_stream(&url, body, &headers).await?)
    }
}

/// Multipart fields for an upload job, in form order.
fn upload_body(request: &UploadRequest) -> RequestBody {
    RequestBody::Multipart(vec![
        FormPart::File {
            name: "clone_data".to_string(),
            file_name: request.clone_data.file_name.clone(),
            mime_type: request.clone_data.mime_type.clone(),
            content: request.clone_data.content.clone(),
        },
        FormPart::File {
            name: "source_audio".to_string(),
            file_name: request.source_audio.file_name.clone(),
            mime_type: request.source_audio.mime_type.clone(),
            content: request.source_audio.content.clone(),
        },
        FormPart::Text {
            name: "voice_ids".to_string(),
            value: request.voice_ids_field(),
        },
    ])
}
