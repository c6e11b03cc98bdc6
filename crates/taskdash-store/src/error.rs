//! Store-level errors and the display-text normalization views rely on.

use std::fmt;

use taskdash_client::{ApiError, ErrorKind, ErrorPayload};
use taskdash_core::ValidationError;

/// Shown when an action failed without any failure value.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Shown when a failure carries no message.
pub const REQUEST_FAILED: &str = "Request failed";

/// Fallback for a failed create or update.
pub const SAVE_FAILED: &str = "Could not save task.";

/// Fallback for a failed delete.
pub const DELETE_FAILED: &str = "Could not delete task.";

/// Turn an optional failure into the text a view displays.
///
/// The failure's own message wins when it is non-blank. A failure without a
/// message becomes [`REQUEST_FAILED`]; no failure at all becomes
/// [`UNKNOWN_ERROR`]. Plain strings are failures too and pass through.
pub fn normalize_error<E>(failure: Option<&E>) -> String
where
    E: fmt::Display + ?Sized,
{
    match failure {
        None => UNKNOWN_ERROR.to_string(),
        Some(failure) => {
            let message = failure.to_string();
            if message.trim().is_empty() {
                REQUEST_FAILED.to_string()
            } else {
                message
            }
        }
    }
}

/// Structured failure of a store action.
///
/// Flattens [`ApiError`] into plain data so it can be cloned into view state
/// and compared in tests.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ActionError {
    /// Failure family.
    pub kind: ErrorKind,
    /// Display text, already normalized.
    pub message: String,
    /// HTTP status for server rejections.
    pub status: Option<u16>,
    /// Error body for server rejections.
    pub payload: Option<ErrorPayload>,
}

impl ActionError {
    /// Replace a blank message with `fallback`.
    pub fn or_message(mut self, fallback: &str) -> Self {
        if self.message.trim().is_empty() {
            self.message = fallback.to_string();
        }
        self
    }

    /// Whether the server rejected the request.
    pub fn is_http(&self) -> bool {
        self.kind == ErrorKind::Http
    }
}

impl From<ApiError> for ActionError {
    fn from(err: ApiError) -> Self {
        Self {
            kind: err.kind(),
            message: normalize_error(Some(&err)),
            status: err.status(),
            payload: err.payload().cloned(),
        }
    }
}

impl From<ValidationError> for ActionError {
    fn from(err: ValidationError) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: err.to_string(),
            status: None,
            payload: None,
        }
    }
}
