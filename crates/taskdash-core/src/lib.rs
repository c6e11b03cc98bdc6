#![deny(missing_docs)]

//! # taskdash-core -- Foundational Types for the Task Dashboard
//!
//! Every other crate in the workspace depends on this one. It performs no I/O
//! and has no internal crate dependencies, only `serde`, `serde_json`,
//! `thiserror` and `chrono` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** You cannot pass a [`StatusId`]
//!    where a [`TaskId`] is expected. Identifiers are always server-assigned;
//!    nothing in this crate mints new ones.
//!
//! 2. **Calendar dates, not instants.** Due dates are [`chrono::NaiveDate`]
//!    exchanged as `YYYY-MM-DD`. Timestamps are UTC.
//!
//! 3. **Derivations are pure.** Kanban grouping, due-soon styling and KPI
//!    ordering live in [`board`] as plain functions over slices, so views never
//!    compute them ad hoc.

pub mod board;
pub mod error;
pub mod form;
pub mod identity;
pub mod model;
pub mod temporal;

pub use board::{
    group_by_status, is_due_soon, kanban_columns, ordered_kpis, KanbanBoard, KanbanColumn, Kpi,
    DUE_SOON_DAYS,
};
pub use error::ValidationError;
pub use form::{TaskDraft, DEFAULT_STATUS_ID};
pub use identity::{StatusId, TaskId, UserId};
pub use model::{
    DashboardSummary, NewTask, Status, StatusCount, Task, TaskFilters, TaskPatch, User,
    DEFAULT_UPCOMING_LIMIT,
};
