//! Page-level sequences of store actions.
//!
//! These mirror what the dashboard and task pages do on open and after a
//! save or delete: load lookups first, then the page's data, and after any
//! mutation refresh both the task list (with the filters in effect) and the
//! dashboard.

use taskdash_client::TaskApi;
use taskdash_core::{Task, TaskDraft, TaskFilters, TaskId, TaskPatch, DEFAULT_UPCOMING_LIMIT};

use crate::error::{ActionError, DELETE_FAILED, SAVE_FAILED};
use crate::store::TaskStore;

/// Load lookups, then the task list for `filters`.
///
/// A lookup failure stops the sequence; the task list is not requested.
pub async fn open_tasks_page<A: TaskApi>(
    store: &TaskStore<A>,
    filters: &TaskFilters,
) -> Result<(), ActionError> {
    store.bootstrap().await?;
    store.refresh_tasks(filters).await
}

/// Load lookups, then the dashboard summary.
pub async fn open_dashboard_page<A: TaskApi>(
    store: &TaskStore<A>,
    upcoming_limit: u32,
) -> Result<(), ActionError> {
    store.bootstrap().await?;
    store.refresh_dashboard(upcoming_limit).await
}

/// Validate a draft and create or update the task.
///
/// `editing` selects update over create. An update sends every editable
/// field, so blank optionals clear the stored value. Nothing is sent when the
/// draft is invalid. After a successful save the task list and dashboard are
/// refreshed; their failures are recorded in the store, not returned.
pub async fn save_task<A: TaskApi>(
    store: &TaskStore<A>,
    editing: Option<TaskId>,
    draft: &TaskDraft,
    filters: &TaskFilters,
) -> Result<Task, ActionError> {
    let payload = draft.validate()?;

    let saved = match editing {
        Some(id) => store.update_task(id, &TaskPatch::replace_with(payload)).await,
        None => store.create_task(&payload).await,
    }
    .map_err(|e| e.or_message(SAVE_FAILED))?;

    refresh_after_mutation(store, filters).await;
    Ok(saved)
}

/// Delete a task, then refresh the task list and dashboard.
pub async fn delete_task<A: TaskApi>(
    store: &TaskStore<A>,
    id: TaskId,
    filters: &TaskFilters,
) -> Result<(), ActionError> {
    store
        .delete_task(id)
        .await
        .map_err(|e| e.or_message(DELETE_FAILED))?;

    refresh_after_mutation(store, filters).await;
    Ok(())
}

async fn refresh_after_mutation<A: TaskApi>(store: &TaskStore<A>, filters: &TaskFilters) {
    if let Err(e) = store.refresh_tasks(filters).await {
        tracing::debug!(error = %e, "task refresh after mutation failed");
    }
    if let Err(e) = store.refresh_dashboard(DEFAULT_UPCOMING_LIMIT).await {
        tracing::debug!(error = %e, "dashboard refresh after mutation failed");
    }
}
