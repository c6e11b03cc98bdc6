//! Route definitions for the task API stub.
//!
//! Implements every endpoint `taskdash-client` calls, with bodies that
//! deserialize into the client's record types. Extractor rejections are
//! converted so that every error carries a `detail` field.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use taskdash_core::{NewTask, StatusId, TaskId, TaskPatch, UserId, DEFAULT_UPCOMING_LIMIT};
use tower_http::trace::TraceLayer;

use crate::error::ApiProblem;
use crate::store::{AppState, TaskQuery};

/// Build the complete router with all task API routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health))
        // Lookups
        .route("/api/statuses", get(list_statuses))
        .route("/api/users", get(list_users))
        // Tasks
        .route("/api/tasks", get(list_tasks).post(create_task))
        .route(
            "/api/tasks/:id",
            get(get_task).patch(update_task).delete(delete_task),
        )
        // Dashboard
        .route("/api/dashboard/summary", get(dashboard_summary))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Health ──────────────────────────────────────────────────────────

async fn health() -> StatusCode {
    StatusCode::OK
}

// ── Lookups ─────────────────────────────────────────────────────────

async fn list_statuses(State(state): State<AppState>) -> Response {
    Json(state.statuses()).into_response()
}

async fn list_users(State(state): State<AppState>) -> Response {
    Json(state.users()).into_response()
}

// ── Tasks ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TaskListParams {
    status_id: Option<i64>,
    assignee_id: Option<i64>,
    due_before: Option<NaiveDate>,
}

impl From<TaskListParams> for TaskQuery {
    fn from(params: TaskListParams) -> Self {
        Self {
            status_id: params.status_id.map(StatusId::new),
            assignee_id: params.assignee_id.map(UserId::new),
            due_before: params.due_before,
        }
    }
}

async fn list_tasks(
    State(state): State<AppState>,
    params: Result<Query<TaskListParams>, QueryRejection>,
) -> Result<Response, ApiProblem> {
    let Query(params) = params.map_err(bad_request)?;
    Ok(Json(state.list_tasks(&params.into())).into_response())
}

async fn get_task(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Response, ApiProblem> {
    let id = task_id(id)?;
    Ok(Json(state.get_task(id)?).into_response())
}

async fn create_task(
    State(state): State<AppState>,
    body: Result<Json<NewTask>, JsonRejection>,
) -> Result<Response, ApiProblem> {
    let Json(new_task) = body.map_err(bad_request)?;
    let task = state.create_task(new_task)?;
    tracing::info!(task_id = %task.id, "task created");
    Ok((StatusCode::CREATED, Json(task)).into_response())
}

async fn update_task(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<TaskPatch>, JsonRejection>,
) -> Result<Response, ApiProblem> {
    let id = task_id(id)?;
    let Json(patch) = body.map_err(bad_request)?;
    let task = state.update_task(id, patch)?;
    tracing::info!(task_id = %task.id, "task updated");
    Ok(Json(task).into_response())
}

async fn delete_task(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiProblem> {
    let id = task_id(id)?;
    state.delete_task(id)?;
    tracing::info!(task_id = %id, "task deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ── Dashboard ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SummaryParams {
    upcoming_limit: Option<u32>,
}

async fn dashboard_summary(
    State(state): State<AppState>,
    params: Result<Query<SummaryParams>, QueryRejection>,
) -> Result<Response, ApiProblem> {
    let Query(params) = params.map_err(bad_request)?;
    let limit = params.upcoming_limit.unwrap_or(DEFAULT_UPCOMING_LIMIT);
    Ok(Json(state.dashboard(limit as usize)).into_response())
}

// ── Fallback ────────────────────────────────────────────────────────

async fn not_found() -> ApiProblem {
    ApiProblem::NotFound("Not Found".into())
}

fn task_id(id: Result<Path<i64>, PathRejection>) -> Result<TaskId, ApiProblem> {
    let Path(id) = id.map_err(bad_request)?;
    Ok(TaskId::new(id))
}

fn bad_request(rejection: impl std::fmt::Display) -> ApiProblem {
    ApiProblem::BadRequest(rejection.to_string())
}
