//! Client configuration.
//!
//! Values come from builder methods or from the environment:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `LEIVO_API_URL` | `http://localhost:8002` |
//! | `LEIVO_OUTPUT_DIR` | unset |
//! | `LEIVO_CONNECT_TIMEOUT_SECS` | `10` |

use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Default conversion server address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8002";

/// Default TCP connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub const ENV_API_URL: &str = "LEIVO_API_URL";
pub const ENV_OUTPUT_DIR: &str = "LEIVO_OUTPUT_DIR";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "LEIVO_CONNECT_TIMEOUT_SECS";

/// Configuration for [`LeivoClient`](crate::client::LeivoClient).
///
/// Only the connect phase is bounded by a timeout. A job stream stays open
/// for as long as the conversion runs.
///
/// # Example
///
/// ```ignore
/// use leivo::config::ClientConfig;
///
/// let config = ClientConfig::default()
///     .with_base_url("http://gpu-box:8002")
///     .with_output_directory("/data/out");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Server base URL, without trailing slash
    pub base_url: String,
    /// Default output directory for batch jobs
    pub output_directory: Option<PathBuf>,
    /// TCP connect timeout
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_directory: None,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server base URL. A trailing slash is removed.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_output_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_directory = Some(dir.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Build config from `LEIVO_*` environment variables.
    ///
    /// Unparseable timeouts fall back to the default with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                config = config.with_base_url(url.trim());
            }
        }

        if let Ok(dir) = std::env::var(ENV_OUTPUT_DIR) {
            if !dir.trim().is_empty() {
                config = config.with_output_directory(dir.trim());
            }
        }

        if let Ok(secs) = std::env::var(ENV_CONNECT_TIMEOUT_SECS) {
            match secs.trim().parse::<u64>() {
                Ok(secs) => config = config.with_connect_timeout(Duration::from_secs(secs)),
                Err(_) => warn!(
                    value = %secs,
                    "Ignoring invalid {}, using {}s",
                    ENV_CONNECT_TIMEOUT_SECS,
                    DEFAULT_CONNECT_TIMEOUT.as_secs()
                ),
            }
        }

        config
    }

    /// Absolute URL for an API path such as `/api/models`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}
