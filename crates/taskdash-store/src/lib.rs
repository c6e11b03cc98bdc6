//! # taskdash-store -- Application state for the task dashboard
//!
//! Holds the client-side cache the views render from and the actions that
//! fill it:
//!
//! - [`TaskStore`]: lookups, task list and dashboard summary with per-collection
//!   loading and error state, plus pass-through create/update/delete.
//! - [`workflow`]: the open/save/delete sequences the pages run.
//! - [`ActionError`] and [`normalize_error`]: failures flattened into display
//!   text and structured data.
//!
//! The store depends only on the [`taskdash_client::TaskApi`] trait, so it can
//! be driven by the real client, the stub server, or an in-process fake.

pub mod error;
pub mod store;
pub mod workflow;

pub use error::{
    normalize_error, ActionError, DELETE_FAILED, REQUEST_FAILED, SAVE_FAILED, UNKNOWN_ERROR,
};
pub use store::{RefreshPolicy, StoreSnapshot, TaskStore};
