//! # taskdash-client -- Typed Rust client for the task dashboard API
//!
//! Provides typed access to the four resources the dashboard reads and writes:
//! - **Statuses** and **Users** (lookup tables)
//! - **Tasks** (filtered list, detail, create, partial update, delete)
//! - **Dashboard summary** (totals, per-status counts, upcoming deadlines)
//!
//! ## Architecture
//!
//! [`HttpClient`] owns URL building and response normalization; [`TaskClient`]
//! layers one method per endpoint on top of it. The [`TaskApi`] trait is the
//! seam the state store depends on, so stores can be driven by fakes in tests.
//!
//! ## Path Convention
//!
//! Every path starts with `/api/` and is appended to the configured base URL,
//! which never carries a trailing slash:
//! `{base_url}/api/{resource}`, e.g. `http://localhost:3001/api/tasks?status_id=2`.

pub mod api;
pub mod config;
pub mod error;
pub mod http;

pub use api::{TaskApi, TaskClient};
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ErrorKind, ErrorPayload};
pub use http::{build_url, ApiRequest, HttpClient};
pub use taskdash_core::DEFAULT_UPCOMING_LIMIT;
