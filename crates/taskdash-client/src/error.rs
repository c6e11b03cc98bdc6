//! Task API client error types.
//!
//! Three failure families reach callers: the request never completed
//! (transport), the server answered outside 2xx (HTTP), or the answer could
//! not be understood (decode). Validation and configuration failures happen
//! before any request is sent.

use serde_json::Value;
use taskdash_core::ValidationError;

use crate::config::ConfigError;

/// Coarse classification of an [`ApiError`], for callers that branch on the
/// failure family rather than the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The request did not complete (connection refused, timeout, reset).
    Transport,
    /// The server returned a non-2xx status.
    Http,
    /// A body could not be encoded or decoded.
    Decode,
    /// Client-side validation rejected the input.
    Validation,
    /// The client is misconfigured.
    Config,
}

/// Body of a non-2xx response, kept for callers that want detail.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorPayload {
    /// No body.
    Empty,
    /// A JSON body.
    Json(Value),
    /// A body that was not valid JSON, passed through verbatim.
    Text(String),
}

impl ErrorPayload {
    /// Parse a response body: JSON when possible, raw text otherwise.
    pub fn parse(body: &str) -> Self {
        if body.is_empty() {
            return Self::Empty;
        }
        match serde_json::from_str(body) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(body.to_string()),
        }
    }

    /// The server-supplied `detail` field, if present and truthy.
    ///
    /// String details are returned verbatim; structured details (for example
    /// a list of field errors) are rendered as compact JSON.
    pub fn detail(&self) -> Option<String> {
        let Self::Json(Value::Object(map)) = self else {
            return None;
        };
        match map.get("detail")? {
            Value::Null | Value::Bool(false) => None,
            Value::String(s) if s.is_empty() => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// The JSON body, if the payload was JSON.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }
}

/// Errors from task API calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP transport error; the request never completed.
    #[error("request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        source: reqwest::Error,
    },
    /// The server returned a non-2xx status. `Display` is the user-facing
    /// message alone.
    #[error("{message}")]
    Http {
        endpoint: String,
        status: u16,
        message: String,
        payload: ErrorPayload,
    },
    /// A request body could not be serialized.
    #[error("failed to encode request body for {endpoint}: {source}")]
    Encode {
        endpoint: String,
        source: serde_json::Error,
    },
    /// A response body could not be deserialized.
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },
    /// A response carried no content where a body was required.
    #[error("{endpoint} returned no content")]
    EmptyBody { endpoint: String },
    /// Input rejected before sending.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl ApiError {
    /// Build an HTTP failure from a status code and raw response body.
    ///
    /// The message prefers the server's `detail` field and falls back to
    /// `Request failed (<status>)`.
    pub fn http(endpoint: impl Into<String>, status: u16, body: &str) -> Self {
        let payload = ErrorPayload::parse(body);
        let message = payload
            .detail()
            .unwrap_or_else(|| format!("Request failed ({status})"));
        Self::Http {
            endpoint: endpoint.into(),
            status,
            message,
            payload,
        }
    }

    /// Failure family.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Http { .. } => ErrorKind::Http,
            Self::Encode { .. } | Self::Decode { .. } | Self::EmptyBody { .. } => ErrorKind::Decode,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Config(_) => ErrorKind::Config,
        }
    }

    /// HTTP status code, for [`ApiError::Http`].
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Parsed error body, for [`ApiError::Http`].
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match self {
            Self::Http { payload, .. } => Some(payload),
            _ => None,
        }
    }
}
