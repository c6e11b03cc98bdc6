//! Typed operations over the task API.
//!
//! ## Paths
//!
//! | Method | Path | Operation |
//! |--------|------|-----------|
//! | GET    | `/api/statuses` | [`TaskClient::list_statuses`] |
//! | GET    | `/api/users` | [`TaskClient::list_users`] |
//! | GET    | `/api/tasks?status_id&assignee_id&due_before` | [`TaskClient::list_tasks`] |
//! | GET    | `/api/tasks/{id}` | [`TaskClient::get_task`] |
//! | POST   | `/api/tasks` | [`TaskClient::create_task`] |
//! | PATCH  | `/api/tasks/{id}` | [`TaskClient::update_task`] |
//! | DELETE | `/api/tasks/{id}` | [`TaskClient::delete_task`] |
//! | GET    | `/api/dashboard/summary?upcoming_limit` | [`TaskClient::dashboard_summary`] |
//!
//! Each operation is a thin wrapper over [`HttpClient`]: no retry, caching or
//! extra validation. Failures are exactly those of the HTTP layer.

use std::future::Future;

use taskdash_core::{
    DashboardSummary, NewTask, Status, Task, TaskFilters, TaskId, TaskPatch, User,
};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{ApiRequest, HttpClient};

const STATUSES_PATH: &str = "/api/statuses";
const USERS_PATH: &str = "/api/users";
const TASKS_PATH: &str = "/api/tasks";
const DASHBOARD_SUMMARY_PATH: &str = "/api/dashboard/summary";

/// The resource operations the application store depends on.
///
/// [`TaskClient`] is the production implementation; tests substitute
/// in-memory fakes.
pub trait TaskApi: Send + Sync {
    /// All statuses.
    fn list_statuses(&self) -> impl Future<Output = Result<Vec<Status>, ApiError>> + Send;

    /// All users.
    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, ApiError>> + Send;

    /// Tasks matching `filters`.
    fn list_tasks(
        &self,
        filters: &TaskFilters,
    ) -> impl Future<Output = Result<Vec<Task>, ApiError>> + Send;

    /// One task.
    fn get_task(&self, id: TaskId) -> impl Future<Output = Result<Task, ApiError>> + Send;

    /// Create a task, returning the stored record.
    fn create_task(&self, task: &NewTask)
        -> impl Future<Output = Result<Task, ApiError>> + Send;

    /// Apply a partial update, returning the stored record.
    fn update_task(
        &self,
        id: TaskId,
        patch: &TaskPatch,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send;

    /// Delete a task.
    fn delete_task(&self, id: TaskId) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Aggregate dashboard view with at most `upcoming_limit` deadlines.
    fn dashboard_summary(
        &self,
        upcoming_limit: u32,
    ) -> impl Future<Output = Result<DashboardSummary, ApiError>> + Send;
}

/// Client for the task API.
#[derive(Debug, Clone)]
pub struct TaskClient {
    http: HttpClient,
}

impl TaskClient {
    /// Create a client from configuration.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        Ok(Self {
            http: HttpClient::new(&config)?,
        })
    }

    /// Create a client configured from the environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::new(ApiConfig::from_env()?)
    }

    /// Access the underlying HTTP client.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// The resolved base URL.
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    /// List statuses.
    ///
    /// Calls `GET {base_url}/api/statuses`.
    pub async fn list_statuses(&self) -> Result<Vec<Status>, ApiError> {
        self.http.request_json(ApiRequest::get(STATUSES_PATH)).await
    }

    /// List users.
    ///
    /// Calls `GET {base_url}/api/users`.
    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.http.request_json(ApiRequest::get(USERS_PATH)).await
    }

    /// List tasks. Filters left `None` are not sent.
    ///
    /// Calls `GET {base_url}/api/tasks?status_id&assignee_id&due_before`.
    pub async fn list_tasks(&self, filters: &TaskFilters) -> Result<Vec<Task>, ApiError> {
        let request = ApiRequest::get(TASKS_PATH).params(filters.query_pairs());
        self.http.request_json(request).await
    }

    /// Get a task by id.
    ///
    /// Calls `GET {base_url}/api/tasks/{id}`.
    pub async fn get_task(&self, id: TaskId) -> Result<Task, ApiError> {
        self.http.request_json(ApiRequest::get(task_path(id))).await
    }

    /// Create a task.
    ///
    /// Calls `POST {base_url}/api/tasks`.
    pub async fn create_task(&self, task: &NewTask) -> Result<Task, ApiError> {
        let request = ApiRequest::post(TASKS_PATH).json(task)?;
        let created: Task = self.http.request_json(request).await?;
        tracing::info!(task_id = %created.id, "created task");
        Ok(created)
    }

    /// Update a task.
    ///
    /// Calls `PATCH {base_url}/api/tasks/{id}`.
    pub async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        let request = ApiRequest::patch(task_path(id)).json(patch)?;
        let updated: Task = self.http.request_json(request).await?;
        tracing::info!(task_id = %updated.id, "updated task");
        Ok(updated)
    }

    /// Delete a task. Any response body is ignored.
    ///
    /// Calls `DELETE {base_url}/api/tasks/{id}`.
    pub async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        self.http.request(ApiRequest::delete(task_path(id))).await?;
        tracing::info!(task_id = %id, "deleted task");
        Ok(())
    }

    /// Get the dashboard summary.
    ///
    /// Calls `GET {base_url}/api/dashboard/summary?upcoming_limit={limit}`.
    pub async fn dashboard_summary(&self, upcoming_limit: u32) -> Result<DashboardSummary, ApiError> {
        let request = ApiRequest::get(DASHBOARD_SUMMARY_PATH)
            .param("upcoming_limit", Some(upcoming_limit.to_string()));
        self.http.request_json(request).await
    }
}

impl TaskApi for TaskClient {
    fn list_statuses(&self) -> impl Future<Output = Result<Vec<Status>, ApiError>> + Send {
        TaskClient::list_statuses(self)
    }

    fn list_users(&self) -> impl Future<Output = Result<Vec<User>, ApiError>> + Send {
        TaskClient::list_users(self)
    }

    fn list_tasks(
        &self,
        filters: &TaskFilters,
    ) -> impl Future<Output = Result<Vec<Task>, ApiError>> + Send {
        TaskClient::list_tasks(self, filters)
    }

    fn get_task(&self, id: TaskId) -> impl Future<Output = Result<Task, ApiError>> + Send {
        TaskClient::get_task(self, id)
    }

    fn create_task(
        &self,
        task: &NewTask,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send {
        TaskClient::create_task(self, task)
    }

    fn update_task(
        &self,
        id: TaskId,
        patch: &TaskPatch,
    ) -> impl Future<Output = Result<Task, ApiError>> + Send {
        TaskClient::update_task(self, id, patch)
    }

    fn delete_task(&self, id: TaskId) -> impl Future<Output = Result<(), ApiError>> + Send {
        TaskClient::delete_task(self, id)
    }

    fn dashboard_summary(
        &self,
        upcoming_limit: u32,
    ) -> impl Future<Output = Result<DashboardSummary, ApiError>> + Send {
        TaskClient::dashboard_summary(self, upcoming_limit)
    }
}

fn task_path(id: TaskId) -> String {
    format!("{TASKS_PATH}/{id}")
}
