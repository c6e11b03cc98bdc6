//! Task API client configuration.
//!
//! The base URL is resolved once, from an ordered list of environment
//! variables, falling back to the local development backend. Trailing slashes
//! are stripped so that paths (which always start with `/`) concatenate
//! predictably.

use url::Url;

/// Backend used when no environment variable is set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Environment variables consulted for the base URL, in priority order.
pub const BASE_URL_VARS: [&str; 2] = ["TASKDASH_API_BASE", "TASKDASH_BACKEND_URL"];

/// Environment variable holding an optional request timeout in seconds.
pub const TIMEOUT_VAR: &str = "TASKDASH_TIMEOUT_SECS";

/// Configuration for connecting to the task API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Absolute base URL without a trailing slash.
    pub base_url: String,
    /// Request timeout in seconds. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    /// Configuration for an explicit base URL.
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: normalize_base_url(base_url)?,
            timeout_secs: None,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `TASKDASH_API_BASE`, then `TASKDASH_BACKEND_URL` (default: `http://localhost:3001`)
    /// - `TASKDASH_TIMEOUT_SECS` (default: no timeout)
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = resolve_base_url(BASE_URL_VARS.iter().map(|var| std::env::var(var).ok()))?;
        let timeout_secs = match std::env::var(TIMEOUT_VAR) {
            Ok(raw) if !raw.trim().is_empty() => Some(
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
            ),
            _ => None,
        };
        Ok(Self {
            base_url,
            timeout_secs,
        })
    }

    /// Configuration pointing at a backend on localhost (tests, stub server).
    pub fn local(port: u16) -> Self {
        Self {
            base_url: format!("http://127.0.0.1:{port}"),
            timeout_secs: None,
        }
    }

    /// Apply a request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
        }
    }
}

/// Pick the first non-blank candidate, or the default, and normalize it.
pub fn resolve_base_url<I>(candidates: I) -> Result<String, ConfigError>
where
    I: IntoIterator<Item = Option<String>>,
{
    let raw = candidates
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    normalize_base_url(&raw)
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|e| ConfigError::InvalidUrl(raw.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidUrl(
            raw.to_string(),
            "not a base URL".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL {0}: {1}")]
    InvalidUrl(String, String),
    #[error("TASKDASH_TIMEOUT_SECS must be a whole number of seconds, got {0:?}")]
    InvalidTimeout(String),
}
