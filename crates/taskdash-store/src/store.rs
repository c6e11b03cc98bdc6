//! # Application State Store
//!
//! [`TaskStore`] caches what the views render: status and user lookups, the
//! current task list and the dashboard summary, each collection with its own
//! loading flag and error text. It is constructed with an injected
//! [`TaskApi`] and owned by the application root; views hold a reference and
//! read [`StoreSnapshot`]s.
//!
//! ## Locking
//!
//! State sits behind a `parking_lot::RwLock`. The lock is only taken for
//! short synchronous reads and writes and is never held across `.await`.
//!
//! ## Refresh ordering
//!
//! Concurrent refreshes of the same collection are not de-duplicated. Which
//! response ends up in state is governed by [`RefreshPolicy`].

use parking_lot::RwLock;
use taskdash_client::TaskApi;
use taskdash_core::{
    DashboardSummary, NewTask, Status, Task, TaskFilters, TaskId, TaskPatch, User,
    DEFAULT_UPCOMING_LIMIT,
};

use crate::error::{normalize_error, ActionError};

/// How overlapping refreshes of one collection are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Every response is applied as it arrives, so a slow stale response can
    /// overwrite a newer one. Every completion clears the loading flag.
    #[default]
    LastResponseWins,
    /// Each refresh takes a generation number. A response whose generation
    /// has been superseded is discarded and leaves the flags to the newer
    /// request.
    LatestRequestWins,
}

/// Point-in-time copy of the store, for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreSnapshot {
    /// Status lookup.
    pub statuses: Vec<Status>,
    /// User lookup.
    pub users: Vec<User>,
    /// Last fetched task list.
    pub tasks: Vec<Task>,
    /// A task refresh is in flight.
    pub tasks_loading: bool,
    /// Error text of the last task refresh; `None` after a success.
    pub tasks_error: Option<String>,
    /// Last fetched dashboard summary.
    pub dashboard: Option<DashboardSummary>,
    /// A dashboard refresh is in flight.
    pub dashboard_loading: bool,
    /// Error text of the last dashboard refresh.
    pub dashboard_error: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Collection {
    Tasks,
    Dashboard,
}

#[derive(Debug, Default)]
struct State {
    view: StoreSnapshot,
    tasks_generation: u64,
    dashboard_generation: u64,
}

impl State {
    fn generation(&self, collection: Collection) -> u64 {
        match collection {
            Collection::Tasks => self.tasks_generation,
            Collection::Dashboard => self.dashboard_generation,
        }
    }

    fn loading_mut(&mut self, collection: Collection) -> &mut bool {
        match collection {
            Collection::Tasks => &mut self.view.tasks_loading,
            Collection::Dashboard => &mut self.view.dashboard_loading,
        }
    }

    fn error_mut(&mut self, collection: Collection) -> &mut Option<String> {
        match collection {
            Collection::Tasks => &mut self.view.tasks_error,
            Collection::Dashboard => &mut self.view.dashboard_error,
        }
    }

    /// Mark a refresh as started and return its generation.
    fn begin(&mut self, collection: Collection) -> u64 {
        let generation = match collection {
            Collection::Tasks => {
                self.tasks_generation += 1;
                self.tasks_generation
            }
            Collection::Dashboard => {
                self.dashboard_generation += 1;
                self.dashboard_generation
            }
        };
        *self.loading_mut(collection) = true;
        *self.error_mut(collection) = None;
        generation
    }
}

// Clears the loading flag when a refresh ends, including when its future is
// dropped mid-flight.
struct LoadingGuard<'a> {
    state: &'a RwLock<State>,
    collection: Collection,
    generation: u64,
    policy: RefreshPolicy,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.write();
        let current = state.generation(self.collection) == self.generation;
        if current || self.policy == RefreshPolicy::LastResponseWins {
            *state.loading_mut(self.collection) = false;
        }
    }
}

/// Client-side cache of the task API, with refresh and mutate actions.
#[derive(Debug)]
pub struct TaskStore<A> {
    api: A,
    policy: RefreshPolicy,
    state: RwLock<State>,
}

impl<A: TaskApi> TaskStore<A> {
    /// Store with the default [`RefreshPolicy`].
    pub fn new(api: A) -> Self {
        Self::with_policy(api, RefreshPolicy::default())
    }

    /// Store with an explicit refresh policy.
    pub fn with_policy(api: A, policy: RefreshPolicy) -> Self {
        Self {
            api,
            policy,
            state: RwLock::new(State::default()),
        }
    }

    /// The injected API.
    pub fn api(&self) -> &A {
        &self.api
    }

    /// The refresh policy in effect.
    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> StoreSnapshot {
        self.state.read().view.clone()
    }

    /// Load the status and user lookups concurrently.
    ///
    /// Both collections are replaced only if both requests succeed. On
    /// failure nothing in the store changes and the first error is returned.
    pub async fn bootstrap(&self) -> Result<(), ActionError> {
        let (statuses, users) =
            tokio::try_join!(self.api.list_statuses(), self.api.list_users()).map_err(|e| {
                tracing::warn!(error = %e, "lookup bootstrap failed");
                ActionError::from(e)
            })?;

        tracing::info!(statuses = statuses.len(), users = users.len(), "loaded lookups");
        let mut state = self.state.write();
        state.view.statuses = statuses;
        state.view.users = users;
        Ok(())
    }

    /// Re-fetch the task list for `filters`.
    ///
    /// On success the list is replaced; on failure the previous list stays
    /// and the error text is recorded. The loading flag is cleared either way.
    pub async fn refresh_tasks(&self, filters: &TaskFilters) -> Result<(), ActionError> {
        let guard = self.begin(Collection::Tasks);
        let result = self.api.list_tasks(filters).await;

        // Declared after `guard`, so the write lock is released before the
        // guard's cleanup takes it again.
        let mut state = self.state.write();
        if !self.is_current(&state, &guard) {
            tracing::warn!(generation = guard.generation, "discarding stale task list");
            return Ok(());
        }
        match result {
            Ok(tasks) => {
                tracing::info!(count = tasks.len(), "refreshed tasks");
                state.view.tasks = tasks;
                Ok(())
            }
            Err(e) => {
                let err = ActionError::from(e);
                tracing::warn!(error = %err, "task refresh failed");
                state.view.tasks_error = Some(normalize_error(Some(&err)));
                Err(err)
            }
        }
    }

    /// Re-fetch the dashboard summary with `upcoming_limit` deadlines.
    pub async fn refresh_dashboard(&self, upcoming_limit: u32) -> Result<(), ActionError> {
        let guard = self.begin(Collection::Dashboard);
        let result = self.api.dashboard_summary(upcoming_limit).await;

        let mut state = self.state.write();
        if !self.is_current(&state, &guard) {
            tracing::warn!(generation = guard.generation, "discarding stale dashboard summary");
            return Ok(());
        }
        match result {
            Ok(summary) => {
                tracing::info!(total = summary.total_tasks, "refreshed dashboard");
                state.view.dashboard = Some(summary);
                Ok(())
            }
            Err(e) => {
                let err = ActionError::from(e);
                tracing::warn!(error = %err, "dashboard refresh failed");
                state.view.dashboard_error = Some(normalize_error(Some(&err)));
                Err(err)
            }
        }
    }

    /// [`refresh_dashboard`](Self::refresh_dashboard) with the default limit of 5.
    pub async fn refresh_dashboard_default(&self) -> Result<(), ActionError> {
        self.refresh_dashboard(DEFAULT_UPCOMING_LIMIT).await
    }

    /// Create a task. Cached collections are not touched.
    pub async fn create_task(&self, task: &NewTask) -> Result<Task, ActionError> {
        Ok(self.api.create_task(task).await?)
    }

    /// Update a task. Cached collections are not touched.
    pub async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> Result<Task, ActionError> {
        Ok(self.api.update_task(id, patch).await?)
    }

    /// Delete a task. Cached collections are not touched.
    pub async fn delete_task(&self, id: TaskId) -> Result<(), ActionError> {
        Ok(self.api.delete_task(id).await?)
    }

    fn begin(&self, collection: Collection) -> LoadingGuard<'_> {
        let generation = self.state.write().begin(collection);
        LoadingGuard {
            state: &self.state,
            collection,
            generation,
            policy: self.policy,
        }
    }

    fn is_current(&self, state: &State, guard: &LoadingGuard<'_>) -> bool {
        self.policy == RefreshPolicy::LastResponseWins
            || state.generation(guard.collection) == guard.generation
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use parking_lot::Mutex;
    use taskdash_client::{ApiError, ErrorKind};
    use taskdash_core::{StatusCount, StatusId, UserId};

    use super::*;

    fn task(id: i64, title: &str) -> Task {
        Task {
            id: TaskId::new(id),
            title: title.to_string(),
            description: None,
            status_id: StatusId::new(1),
            status: Some("To Do".into()),
            assignee_id: None,
            assignee_name: None,
            due_date: None,
            created_at: None,
            updated_at: None,
        }
    }

    fn server_error(status: u16, detail: &str) -> ApiError {
        ApiError::http("GET /api/test", status, &format!(r#"{{"detail":"{detail}"}}"#))
    }

    fn summary(total: u64) -> DashboardSummary {
        DashboardSummary {
            total_tasks: total,
            by_status: vec![StatusCount {
                status_id: StatusId::new(1),
                status: "To Do".into(),
                count: total,
            }],
            upcoming_deadlines: vec![],
        }
    }

    /// Scripted fake: each list/dashboard call pops the next queued response,
    /// optionally after a delay.
    #[derive(Default)]
    struct FakeApi {
        statuses: Mutex<Option<Result<Vec<Status>, u16>>>,
        users: Mutex<Option<Result<Vec<User>, u16>>>,
        task_lists: Mutex<VecDeque<(u64, Result<Vec<Task>, u16>)>>,
        summaries: Mutex<VecDeque<(u64, Result<DashboardSummary, u16>)>>,
        calls: AtomicUsize,
    }

    impl FakeApi {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TaskApi for FakeApi {
        fn list_statuses(&self) -> impl Future<Output = Result<Vec<Status>, ApiError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.statuses.lock().clone().unwrap_or(Ok(vec![]));
            async move { next.map_err(|s| server_error(s, "statuses unavailable")) }
        }

        fn list_users(&self) -> impl Future<Output = Result<Vec<User>, ApiError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.users.lock().clone().unwrap_or(Ok(vec![]));
            async move { next.map_err(|s| server_error(s, "users unavailable")) }
        }

        fn list_tasks(
            &self,
            _filters: &TaskFilters,
        ) -> impl Future<Output = Result<Vec<Task>, ApiError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay, next) = self.task_lists.lock().pop_front().unwrap_or((0, Ok(vec![])));
            async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                next.map_err(|s| server_error(s, "tasks unavailable"))
            }
        }

        fn get_task(&self, id: TaskId) -> impl Future<Output = Result<Task, ApiError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            async move { Ok(task(id.get(), "fetched")) }
        }

        fn create_task(
            &self,
            new_task: &NewTask,
        ) -> impl Future<Output = Result<Task, ApiError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let created = task(100, &new_task.title);
            async move { Ok(created) }
        }

        fn update_task(
            &self,
            id: TaskId,
            patch: &TaskPatch,
        ) -> impl Future<Output = Result<Task, ApiError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let title = patch.title.clone().unwrap_or_default();
            async move { Ok(task(id.get(), &title)) }
        }

        fn delete_task(&self, _id: TaskId) -> impl Future<Output = Result<(), ApiError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        }

        fn dashboard_summary(
            &self,
            _upcoming_limit: u32,
        ) -> impl Future<Output = Result<DashboardSummary, ApiError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let (delay, next) = self.summaries.lock().pop_front().unwrap_or((0, Ok(summary(0))));
            async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                next.map_err(|s| server_error(s, "dashboard unavailable"))
            }
        }
    }

    fn lookups() -> (Vec<Status>, Vec<User>) {
        (
            vec![Status {
                id: StatusId::new(1),
                name: "To Do".into(),
            }],
            vec![User {
                id: UserId::new(7),
                name: "Ada".into(),
                email: None,
            }],
        )
    }

    #[tokio::test]
    async fn bootstrap_replaces_both_lookups() {
        let (statuses, users) = lookups();
        let api = FakeApi::default();
        *api.statuses.lock() = Some(Ok(statuses.clone()));
        *api.users.lock() = Some(Ok(users.clone()));

        let store = TaskStore::new(api);
        store.bootstrap().await.unwrap();

        let snap = store.snapshot();
        assert_eq!(snap.statuses, statuses);
        assert_eq!(snap.users, users);
    }

    #[tokio::test]
    async fn bootstrap_failure_leaves_state_untouched() {
        let (statuses, users) = lookups();
        let api = FakeApi::default();
        *api.statuses.lock() = Some(Ok(statuses.clone()));
        *api.users.lock() = Some(Ok(users.clone()));
        let store = TaskStore::new(api);
        store.bootstrap().await.unwrap();

        *store.api().statuses.lock() = Some(Ok(vec![]));
        *store.api().users.lock() = Some(Err(503));
        let err = store.bootstrap().await.unwrap_err();
        assert_eq!(err.message, "users unavailable");
        assert_eq!(err.status, Some(503));

        let snap = store.snapshot();
        assert_eq!(snap.statuses, statuses);
        assert_eq!(snap.users, users);
        assert!(!snap.tasks_loading);
        assert_eq!(snap.tasks_error, None);
    }

    #[tokio::test]
    async fn refresh_tasks_replaces_list_and_clears_flags() {
        let api = FakeApi::default();
        api.task_lists
            .lock()
            .push_back((0, Ok(vec![task(1, "a"), task(2, "b")])));
        let store = TaskStore::new(api);

        store.refresh_tasks(&TaskFilters::all()).await.unwrap();
        let snap = store.snapshot();
        assert_eq!(snap.tasks.len(), 2);
        assert!(!snap.tasks_loading);
        assert_eq!(snap.tasks_error, None);
    }

    #[tokio::test]
    async fn refresh_tasks_failure_keeps_previous_list() {
        let api = FakeApi::default();
        {
            let mut lists = api.task_lists.lock();
            lists.push_back((0, Ok(vec![task(1, "a")])));
            lists.push_back((0, Err(500)));
            lists.push_back((0, Ok(vec![])));
        }
        let store = TaskStore::new(api);
        store.refresh_tasks(&TaskFilters::all()).await.unwrap();

        let err = store.refresh_tasks(&TaskFilters::all()).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Http);
        let snap = store.snapshot();
        assert_eq!(snap.tasks.len(), 1);
        assert_eq!(snap.tasks_error.as_deref(), Some("tasks unavailable"));
        assert!(!snap.tasks_loading);

        // A later success clears the error.
        store.refresh_tasks(&TaskFilters::all()).await.unwrap();
        let snap = store.snapshot();
        assert!(snap.tasks.is_empty());
        assert_eq!(snap.tasks_error, None);
    }

    #[tokio::test]
    async fn loading_flag_is_set_while_in_flight() {
        let api = FakeApi::default();
        api.task_lists.lock().push_back((50, Ok(vec![task(1, "a")])));
        let store = TaskStore::new(api);

        let filters = TaskFilters::all();
        let refresh = store.refresh_tasks(&filters);
        let observe = async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            store.snapshot().tasks_loading
        };
        let (result, loading_midway) = tokio::join!(refresh, observe);
        result.unwrap();
        assert!(loading_midway);
        assert!(!store.snapshot().tasks_loading);
    }

    #[tokio::test]
    async fn dropped_refresh_still_clears_loading() {
        let api = FakeApi::default();
        api.task_lists.lock().push_back((1_000, Ok(vec![task(1, "a")])));
        let store = TaskStore::new(api);

        let filters = TaskFilters::all();
        let timed_out =
            tokio::time::timeout(Duration::from_millis(10), store.refresh_tasks(&filters)).await;
        assert!(timed_out.is_err());
        assert!(!store.snapshot().tasks_loading);
        assert!(store.snapshot().tasks.is_empty());
    }

    #[tokio::test]
    async fn dashboard_flags_are_independent_of_tasks() {
        let api = FakeApi::default();
        api.summaries.lock().push_back((0, Err(502)));
        let store = TaskStore::new(api);

        assert!(store.refresh_dashboard_default().await.is_err());
        let snap = store.snapshot();
        assert_eq!(snap.dashboard_error.as_deref(), Some("dashboard unavailable"));
        assert!(!snap.dashboard_loading);
        assert_eq!(snap.tasks_error, None);
        assert!(snap.dashboard.is_none());

        store.refresh_dashboard(5).await.unwrap();
        let snap = store.snapshot();
        assert_eq!(snap.dashboard, Some(summary(0)));
        assert_eq!(snap.dashboard_error, None);
    }

    #[tokio::test]
    async fn last_response_wins_lets_a_stale_response_overwrite() {
        let api = FakeApi::default();
        {
            let mut lists = api.task_lists.lock();
            lists.push_back((60, Ok(vec![task(1, "stale")])));
            lists.push_back((5, Ok(vec![task(2, "fresh")])));
        }
        let store = TaskStore::new(api);
        let filters = TaskFilters::all();

        let (first, second) = tokio::join!(store.refresh_tasks(&filters), store.refresh_tasks(&filters));
        first.unwrap();
        second.unwrap();

        let snap = store.snapshot();
        assert_eq!(snap.tasks[0].title, "stale");
        assert!(!snap.tasks_loading);
    }

    #[tokio::test]
    async fn latest_request_wins_discards_the_stale_response() {
        let api = FakeApi::default();
        {
            let mut lists = api.task_lists.lock();
            lists.push_back((60, Ok(vec![task(1, "stale")])));
            lists.push_back((5, Ok(vec![task(2, "fresh")])));
        }
        let store = TaskStore::with_policy(api, RefreshPolicy::LatestRequestWins);
        let filters = TaskFilters::all();

        let (first, second) = tokio::join!(store.refresh_tasks(&filters), store.refresh_tasks(&filters));
        first.unwrap();
        second.unwrap();

        let snap = store.snapshot();
        assert_eq!(snap.tasks[0].title, "fresh");
        assert!(!snap.tasks_loading);
    }

    #[tokio::test]
    async fn latest_request_wins_ignores_a_stale_failure() {
        let api = FakeApi::default();
        {
            let mut summaries = api.summaries.lock();
            summaries.push_back((60, Err(500)));
            summaries.push_back((5, Ok(summary(3))));
        }
        let store = TaskStore::with_policy(api, RefreshPolicy::LatestRequestWins);

        let (first, second) = tokio::join!(store.refresh_dashboard(5), store.refresh_dashboard(5));
        assert!(first.is_ok());
        second.unwrap();

        let snap = store.snapshot();
        assert_eq!(snap.dashboard, Some(summary(3)));
        assert_eq!(snap.dashboard_error, None);
        assert!(!snap.dashboard_loading);
    }

    #[tokio::test]
    async fn mutations_do_not_touch_cached_collections() {
        let api = FakeApi::default();
        api.task_lists.lock().push_back((0, Ok(vec![task(1, "a")])));
        let store = TaskStore::new(api);
        store.refresh_tasks(&TaskFilters::all()).await.unwrap();

        let created = store
            .create_task(&NewTask::new("new", StatusId::new(1)))
            .await
            .unwrap();
        assert_eq!(created.title, "new");
        store.delete_task(TaskId::new(1)).await.unwrap();
        let updated = store
            .update_task(
                TaskId::new(1),
                &TaskPatch {
                    title: Some("renamed".into()),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "renamed");

        assert_eq!(store.snapshot().tasks, vec![task(1, "a")]);
        assert_eq!(store.api().calls(), 4);
    }
}
