//! Error responses of the stub server.
//!
//! Every failure is returned as `{"detail": "<message>"}`, the shape the
//! client reads its error message from.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

/// JSON error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message.
    pub detail: String,
}

/// Failure of a stub request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiProblem {
    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),
    /// Input failed validation (422).
    #[error("{0}")]
    Validation(String),
    /// Malformed path, query or body (400).
    #[error("{0}")]
    BadRequest(String),
}

impl ApiProblem {
    /// HTTP status for this problem.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiProblem {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::debug!(status = status.as_u16(), detail = %self, "rejecting request");
        (
            status,
            Json(ErrorBody {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}
