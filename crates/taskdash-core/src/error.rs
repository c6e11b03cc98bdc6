//! # Validation Errors
//!
//! Client-side validation failures, raised before any request is issued.
//! The `Display` text of [`ValidationError::TitleRequired`] is shown to users
//! verbatim, so it is phrased as a sentence.

use thiserror::Error;

/// Validation errors for form input and identifier parsing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The task title is empty after trimming.
    #[error("Title is required.")]
    TitleRequired,

    /// A date string is not a `YYYY-MM-DD` calendar date.
    #[error("invalid date: \"{value}\" (expected YYYY-MM-DD)")]
    InvalidDate {
        /// The rejected input.
        value: String,
    },

    /// An identifier string is not an integer.
    #[error("invalid {kind} id: \"{value}\"")]
    InvalidId {
        /// Which identifier family was being parsed ("task", "status", "user").
        kind: &'static str,
        /// The rejected input.
        value: String,
    },
}
