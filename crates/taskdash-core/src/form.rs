//! # Task Form State
//!
//! [`TaskDraft`] holds what a user typed into the create/edit form. It is
//! validated into a [`NewTask`] before any request is made, so an empty title
//! never reaches the network.

use crate::error::ValidationError;
use crate::identity::{StatusId, UserId};
use crate::model::{NewTask, Task};
use crate::temporal::{format_date, parse_date};

/// Status preselected for new tasks.
pub const DEFAULT_STATUS_ID: StatusId = StatusId::new(1);

/// Raw, unvalidated form input for creating or editing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Title as typed.
    pub title: String,
    /// Description as typed; blank means none.
    pub description: String,
    /// Selected status; `None` falls back to [`DEFAULT_STATUS_ID`].
    pub status_id: Option<StatusId>,
    /// Selected assignee; `None` means unassigned.
    pub assignee_id: Option<UserId>,
    /// Due date as typed (`YYYY-MM-DD`); blank means none.
    pub due_date: String,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            status_id: Some(DEFAULT_STATUS_ID),
            assignee_id: None,
            due_date: String::new(),
        }
    }
}

impl TaskDraft {
    /// Empty form for a new task.
    pub fn new() -> Self {
        Self::default()
    }

    /// Form prefilled from an existing task, for editing.
    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            description: task.description.clone().unwrap_or_default(),
            status_id: Some(task.status_id),
            assignee_id: task.assignee_id,
            due_date: task.due_date.map(format_date).unwrap_or_default(),
        }
    }

    /// Validate and normalize into a request payload.
    ///
    /// Title and description are trimmed; a blank description or due date
    /// becomes `None`.
    pub fn validate(&self) -> Result<NewTask, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::TitleRequired);
        }

        let description = self.description.trim();
        let due_date = if self.due_date.trim().is_empty() {
            None
        } else {
            Some(parse_date(&self.due_date)?)
        };

        Ok(NewTask {
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            status_id: self.status_id.unwrap_or(DEFAULT_STATUS_ID),
            due_date,
            assignee_id: self.assignee_id,
        })
    }
}
