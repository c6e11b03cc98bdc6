//! In-memory storage backend using DashMap.
//!
//! Statuses and users are fixed lookup tables seeded at construction. Tasks
//! live in a `DashMap<TaskId, Task>` with ids from an atomic sequence, and
//! carry their denormalized status and assignee names.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use dashmap::DashMap;
use taskdash_core::{
    DashboardSummary, NewTask, Status, StatusCount, StatusId, Task, TaskId, TaskPatch, User,
    UserId,
};

use crate::error::ApiProblem;

/// Filters accepted by `GET /api/tasks`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskQuery {
    /// Only tasks in this status.
    pub status_id: Option<StatusId>,
    /// Only tasks assigned to this user.
    pub assignee_id: Option<UserId>,
    /// Only tasks due on or before this date.
    pub due_before: Option<NaiveDate>,
}

impl TaskQuery {
    fn matches(&self, task: &Task) -> bool {
        self.status_id.map_or(true, |id| task.status_id == id)
            && self.assignee_id.map_or(true, |id| task.assignee_id == Some(id))
            && self
                .due_before
                .map_or(true, |limit| task.due_date.is_some_and(|due| due <= limit))
    }
}

struct Inner {
    statuses: Vec<Status>,
    users: Vec<User>,
    tasks: DashMap<TaskId, Task>,
    next_id: AtomicI64,
}

/// Shared application state holding the in-memory store.
///
/// Cheaply cloneable via `Arc`; all clones share the same data.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Seeded lookups and no tasks.
    pub fn new() -> Self {
        let statuses = [(1, "To Do"), (2, "In Progress"), (3, "Done")]
            .into_iter()
            .map(|(id, name)| Status {
                id: StatusId::new(id),
                name: name.to_string(),
            })
            .collect();
        let users = [
            (1, "Ada Lovelace", "ada@example.com"),
            (2, "Grace Hopper", "grace@example.com"),
            (3, "Alan Turing", "alan@example.com"),
        ]
        .into_iter()
        .map(|(id, name, email)| User {
            id: UserId::new(id),
            name: name.to_string(),
            email: Some(email.to_string()),
        })
        .collect();

        Self {
            inner: Arc::new(Inner {
                statuses,
                users,
                tasks: DashMap::new(),
                next_id: AtomicI64::new(1),
            }),
        }
    }

    /// Seeded lookups plus a handful of demo tasks due around today.
    pub fn with_sample_tasks() -> Self {
        let state = Self::new();
        let today = Utc::now().date_naive();
        let samples = [
            ("Draft release notes", 1, Some(2), Some(1)),
            ("Review onboarding flow", 2, Some(1), Some(3)),
            ("Fix login redirect", 2, None, Some(-1)),
            ("Archive old sprint board", 3, Some(3), None),
            ("Plan Q4 roadmap", 1, Some(1), Some(10)),
        ];
        for (title, status, assignee, due_in) in samples {
            let mut task = NewTask::new(title, StatusId::new(status));
            task.assignee_id = assignee.map(UserId::new);
            task.due_date = due_in.map(|days| today + Duration::days(days));
            // Seed rows reference seeded lookups, so they always validate.
            if let Err(problem) = state.create_task(task) {
                tracing::warn!(%problem, "skipping invalid sample task");
            }
        }
        state
    }

    /// Status lookup, in id order.
    pub fn statuses(&self) -> &[Status] {
        &self.inner.statuses
    }

    /// User lookup, in id order.
    pub fn users(&self) -> &[User] {
        &self.inner.users
    }

    /// Tasks matching `query`, in id order.
    pub fn list_tasks(&self, query: &TaskQuery) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .inner
            .tasks
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        tasks.sort_by_key(|t| t.id);
        tasks
    }

    /// One task.
    pub fn get_task(&self, id: TaskId) -> Result<Task, ApiProblem> {
        self.inner
            .tasks
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| not_found(id))
    }

    /// Validate and store a new task.
    pub fn create_task(&self, new_task: NewTask) -> Result<Task, ApiProblem> {
        let title = require_title(&new_task.title)?;
        let status = self.status_name(new_task.status_id)?;
        let assignee_name = self.assignee_name(new_task.assignee_id)?;

        let now = Utc::now();
        let id = TaskId::new(self.inner.next_id.fetch_add(1, Ordering::SeqCst));
        let task = Task {
            id,
            title,
            description: new_task.description,
            status_id: new_task.status_id,
            status: Some(status),
            assignee_id: new_task.assignee_id,
            assignee_name,
            due_date: new_task.due_date,
            created_at: Some(now),
            updated_at: Some(now),
        };
        self.inner.tasks.insert(id, task.clone());
        Ok(task)
    }

    /// Apply a partial update. Fields absent from `patch` are kept.
    pub fn update_task(&self, id: TaskId, patch: TaskPatch) -> Result<Task, ApiProblem> {
        // Resolve references before taking the entry lock.
        let title = patch.title.as_deref().map(require_title).transpose()?;
        let status = patch
            .status_id
            .map(|sid| self.status_name(sid).map(|name| (sid, name)))
            .transpose()?;
        let assignee = patch
            .assignee_id
            .map(|aid| self.assignee_name(aid).map(|name| (aid, name)))
            .transpose()?;

        let mut entry = self.inner.tasks.get_mut(&id).ok_or_else(|| not_found(id))?;
        let task = entry.value_mut();
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(description) = patch.description {
            task.description = description;
        }
        if let Some((status_id, name)) = status {
            task.status_id = status_id;
            task.status = Some(name);
        }
        if let Some((assignee_id, name)) = assignee {
            task.assignee_id = assignee_id;
            task.assignee_name = name;
        }
        if let Some(due_date) = patch.due_date {
            task.due_date = due_date;
        }
        task.updated_at = Some(Utc::now());
        Ok(task.clone())
    }

    /// Remove a task.
    pub fn delete_task(&self, id: TaskId) -> Result<(), ApiProblem> {
        self.inner
            .tasks
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }

    /// Totals, per-status counts (zeros included, in status id order) and up
    /// to `upcoming_limit` dated tasks, soonest first.
    pub fn dashboard(&self, upcoming_limit: usize) -> DashboardSummary {
        let tasks = self.list_tasks(&TaskQuery::default());

        let by_status = self
            .inner
            .statuses
            .iter()
            .map(|status| StatusCount {
                status_id: status.id,
                status: status.name.clone(),
                count: tasks.iter().filter(|t| t.status_id == status.id).count() as u64,
            })
            .collect();

        let mut upcoming: Vec<Task> = tasks.iter().filter(|t| t.due_date.is_some()).cloned().collect();
        upcoming.sort_by_key(|t| (t.due_date, t.id));
        upcoming.truncate(upcoming_limit);

        DashboardSummary {
            total_tasks: tasks.len() as u64,
            by_status,
            upcoming_deadlines: upcoming,
        }
    }

    fn status_name(&self, id: StatusId) -> Result<String, ApiProblem> {
        self.inner
            .statuses
            .iter()
            .find(|s| s.id == id)
            .map(|s| s.name.clone())
            .ok_or_else(|| ApiProblem::Validation(format!("Unknown status_id {id}")))
    }

    fn assignee_name(&self, id: Option<UserId>) -> Result<Option<String>, ApiProblem> {
        let Some(id) = id else {
            return Ok(None);
        };
        self.inner
            .users
            .iter()
            .find(|u| u.id == id)
            .map(|u| Some(u.name.clone()))
            .ok_or_else(|| ApiProblem::Validation(format!("Unknown assignee_id {id}")))
    }
}

fn require_title(title: &str) -> Result<String, ApiProblem> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ApiProblem::Validation("Title is required.".into()));
    }
    Ok(trimmed.to_string())
}

fn not_found(id: TaskId) -> ApiProblem {
    ApiProblem::NotFound(format!("Task {id} not found"))
}
