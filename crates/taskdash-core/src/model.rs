//! # Domain Records
//!
//! Records mirrored from the backend and the payloads sent back to it.
//!
//! Read records use `#[serde(default)]` on every optional field so that a
//! backend omitting a denormalized column (`status`, `assignee_name`) does not
//! fail the whole list. Unknown fields are ignored.
//!
//! Write payloads never serialize absent optional fields. [`TaskPatch`] keeps
//! nullable columns tri-state: absent (not sent), `Some(None)` (explicit
//! `null`, clears the column) or `Some(Some(v))`.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::identity::{StatusId, TaskId, UserId};
use crate::temporal::{format_date, lenient_datetime};

/// Default number of upcoming deadlines requested for the dashboard.
pub const DEFAULT_UPCOMING_LIMIT: u32 = 5;

/// A task status lookup row ("To Do", "In Progress", "Done").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    /// Server-assigned identifier.
    pub id: StatusId,
    /// Display name.
    pub name: String,
}

/// A user lookup row; the candidate assignees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact address, when the backend exposes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// A task as returned by list, detail and mutation endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Server-assigned identifier.
    pub id: TaskId,
    /// Short title; never empty for tasks created through this client.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Reference to the task's status.
    pub status_id: StatusId,
    /// Denormalized status name.
    #[serde(default)]
    pub status: Option<String>,
    /// Reference to the assigned user.
    #[serde(default)]
    pub assignee_id: Option<UserId>,
    /// Denormalized assignee name.
    #[serde(default)]
    pub assignee_name: Option<String>,
    /// Calendar due date.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Creation time, when the backend exposes it.
    #[serde(
        default,
        deserialize_with = "lenient_datetime::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
    /// Last modification time.
    #[serde(default, deserialize_with = "lenient_datetime::deserialize")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Status name for display, empty when the backend did not denormalize it.
    pub fn status_name(&self) -> &str {
        self.status.as_deref().unwrap_or("")
    }

    /// Assignee name for display.
    pub fn assignee_label(&self) -> &str {
        self.assignee_name.as_deref().unwrap_or("Unassigned")
    }
}

/// Per-status task count in the dashboard summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    /// Status the count belongs to.
    pub status_id: StatusId,
    /// Denormalized status name.
    #[serde(default)]
    pub status: String,
    /// Number of tasks currently in that status.
    pub count: u64,
}

/// Aggregate dashboard view. Derived by the backend, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardSummary {
    /// Total number of tasks.
    pub total_tasks: u64,
    /// Counts per status.
    #[serde(default)]
    pub by_status: Vec<StatusCount>,
    /// Soonest-due tasks, soonest first, capped by the requested limit.
    #[serde(default)]
    pub upcoming_deadlines: Vec<Task>,
}

/// Filters accepted by the task list endpoint. `None` means "not sent".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilters {
    /// Only tasks in this status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_id: Option<StatusId>,
    /// Only tasks assigned to this user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<UserId>,
    /// Only tasks due on or before this date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_before: Option<NaiveDate>,
}

impl TaskFilters {
    /// No filtering.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to a status.
    pub fn with_status(mut self, status_id: StatusId) -> Self {
        self.status_id = Some(status_id);
        self
    }

    /// Restrict to an assignee.
    pub fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Restrict to tasks due on or before a date.
    pub fn with_due_before(mut self, due_before: NaiveDate) -> Self {
        self.due_before = Some(due_before);
        self
    }

    /// Query parameters in wire order. Absent filters are present as `None`
    /// so the HTTP layer decides omission in one place.
    pub fn query_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("status_id", self.status_id.map(|id| id.to_string())),
            ("assignee_id", self.assignee_id.map(|id| id.to_string())),
            ("due_before", self.due_before.map(format_date)),
        ]
    }
}

/// Body of `POST /api/tasks`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Required title.
    pub title: String,
    /// Optional description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Required status reference.
    pub status_id: StatusId,
    /// Optional due date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Optional assignee reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<UserId>,
}

impl NewTask {
    /// A task with only the required fields set.
    pub fn new(title: impl Into<String>, status_id: StatusId) -> Self {
        Self {
            title: title.into(),
            description: None,
            status_id,
            due_date: None,
            assignee_id: None,
        }
    }
}

/// Body of `PATCH /api/tasks/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description; `Some(None)` clears it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub description: Option<Option<String>>,
    /// New status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_id: Option<StatusId>,
    /// New due date; `Some(None)` clears it.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub due_date: Option<Option<NaiveDate>>,
    /// New assignee; `Some(None)` unassigns.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_present"
    )]
    pub assignee_id: Option<Option<UserId>>,
}

impl TaskPatch {
    /// A patch that overwrites every editable field with the values of
    /// `task`, sending explicit nulls for absent optionals.
    pub fn replace_with(task: NewTask) -> Self {
        Self {
            title: Some(task.title),
            description: Some(task.description),
            status_id: Some(task.status_id),
            due_date: Some(task.due_date),
            assignee_id: Some(task.assignee_id),
        }
    }

    /// Whether the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status_id.is_none()
            && self.due_date.is_none()
            && self.assignee_id.is_none()
    }
}

// A field that is present maps to `Some`, even when its value is `null`.
// Absent fields fall back to `Default` (`None`) via `#[serde(default)]`.
fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
