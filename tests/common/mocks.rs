//! Mock implementations for test fixtures.
//!
//! This module re-exports the mock implementations from `leivo::adapters::mock`
//! and provides scripted-server helpers on top of them.

pub use leivo::adapters::mock::{MockHttpClient, MockResponse};
pub use leivo::traits::{Headers, HttpClient, HttpError, Response};

use bytes::Bytes;
use leivo::client::LeivoClient;
use leivo::config::ClientConfig;

/// Base URL the scripted client talks to.
pub const MOCK_BASE_URL: &str = "http://mock.leivo";

/// Configuration for setting up a scripted conversion server.
pub struct MockServerConfig {
    client: MockHttpClient,
}

#[allow(dead_code)]
impl MockServerConfig {
    pub fn new() -> Self {
        Self {
            client: MockHttpClient::new(),
        }
    }

    /// Answer `path` with a JSON body.
    pub fn with_json_response(self, path: &str, status: u16, json: &str) -> Self {
        self.client.set_response(
            &format!("{}{}", MOCK_BASE_URL, path),
            MockResponse::Success(Response::new(status, Bytes::from(json.to_string()))),
        );
        self
    }

    /// Stream `chunks` from `path`, then end cleanly.
    pub fn with_stream(self, path: &str, chunks: Vec<Bytes>) -> Self {
        self.client
            .set_response(&format!("{}{}", MOCK_BASE_URL, path), MockResponse::Stream(chunks));
        self
    }

    /// Stream `chunks` from `path`, then fail with `err`.
    pub fn with_broken_stream(self, path: &str, chunks: Vec<Bytes>, err: HttpError) -> Self {
        self.client.set_response(
            &format!("{}{}", MOCK_BASE_URL, path),
            MockResponse::StreamThenError(chunks, err),
        );
        self
    }

    /// Stream `chunks` from `path`, then go silent.
    pub fn with_hanging_stream(self, path: &str, chunks: Vec<Bytes>) -> Self {
        self.client.set_response(
            &format!("{}{}", MOCK_BASE_URL, path),
            MockResponse::StreamThenHang(chunks),
        );
        self
    }

    /// Build a client over the scripted responses, keeping a handle for
    /// request inspection.
    pub fn build(self) -> (LeivoClient<MockHttpClient>, MockHttpClient) {
        let config = ClientConfig::default().with_base_url(MOCK_BASE_URL);
        let client = LeivoClient::with_http_client(config, self.client.clone());
        (client, self.client)
    }
}

impl Default for MockServerConfig {
    fn default() -> Self {
        Self::new()
    }
}
