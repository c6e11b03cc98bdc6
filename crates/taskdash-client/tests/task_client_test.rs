//! Contract tests for `TaskClient` against the task API paths.
//!
//! ## Endpoints Tested
//!
//! | Method | Path | Test |
//! |--------|------|------|
//! | GET    | `/api/statuses` | `list_statuses_*` |
//! | GET    | `/api/users` | `list_users_*` |
//! | GET    | `/api/tasks` | `list_tasks_*` |
//! | GET    | `/api/tasks/{id}` | `get_task_*` |
//! | POST   | `/api/tasks` | `create_task_*` |
//! | PATCH  | `/api/tasks/{id}` | `update_task_*` |
//! | DELETE | `/api/tasks/{id}` | `delete_task_*` |
//! | GET    | `/api/dashboard/summary` | `dashboard_summary_*` |

use chrono::NaiveDate;
use serde_json::json;
use taskdash_client::{ApiConfig, ErrorKind, TaskApi, TaskClient};
use taskdash_core::{NewTask, StatusId, TaskFilters, TaskId, TaskPatch, UserId};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> TaskClient {
    TaskClient::new(ApiConfig::new(&mock_server.uri()).unwrap()).unwrap()
}

fn task_json(id: i64, title: &str, status_id: i64, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "status_id": status_id,
        "status": status,
        "assignee_id": null,
        "assignee_name": null,
        "due_date": null,
        "updated_at": "2026-10-15T08:30:00"
    })
}

// ── GET /api/statuses, /api/users ────────────────────────────────────

#[tokio::test]
async fn list_statuses_returns_lookup_rows() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/statuses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "To Do"},
            {"id": 2, "name": "In Progress"},
            {"id": 3, "name": "Done"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let statuses = test_client(&mock_server).list_statuses().await.unwrap();
    let names: Vec<&str> = statuses.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["To Do", "In Progress", "Done"]);
    assert_eq!(statuses[1].id, StatusId::new(2));
}

#[tokio::test]
async fn list_users_returns_lookup_rows() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "name": "Ada", "email": "ada@example.com"},
            {"id": 8, "name": "Grace"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let users = test_client(&mock_server).list_users().await.unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0].email.as_deref(), Some("ada@example.com"));
    assert_eq!(users[1].id, UserId::new(8));
}

// ── GET /api/tasks ───────────────────────────────────────────────────

#[tokio::test]
async fn list_tasks_sends_only_present_filters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(query_param("status_id", "2"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([task_json(5, "Review PR", 2, "In Progress")])),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let tasks = client
        .list_tasks(&TaskFilters::all().with_status(StatusId::new(2)))
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].status_name(), "In Progress");

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received[0].url.path(), "/api/tasks");
    assert_eq!(received[0].url.query(), Some("status_id=2"));
}

#[tokio::test]
async fn list_tasks_without_filters_has_no_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let tasks = test_client(&mock_server)
        .list_tasks(&TaskFilters::all())
        .await
        .unwrap();
    assert!(tasks.is_empty());

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received[0].url.query(), None);
}

#[tokio::test]
async fn list_tasks_formats_due_before_as_calendar_date() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .and(query_param("assignee_id", "7"))
        .and(query_param("due_before", "2026-11-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let filters = TaskFilters::all()
        .with_assignee(UserId::new(7))
        .with_due_before(NaiveDate::from_ymd_opt(2026, 11, 1).unwrap());
    test_client(&mock_server).list_tasks(&filters).await.unwrap();
}

// ── GET /api/tasks/{id} ──────────────────────────────────────────────

#[tokio::test]
async fn get_task_uses_id_path() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tasks/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(12, "Plan", 1, "To Do")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let task = test_client(&mock_server).get_task(TaskId::new(12)).await.unwrap();
    assert_eq!(task.id, TaskId::new(12));
    assert_eq!(task.title, "Plan");
}

#[tokio::test]
async fn get_task_handles_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/tasks/404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Task not found"})))
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server)
        .get_task(TaskId::new(404))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Task not found");
    assert_eq!(err.status(), Some(404));
}

// ── POST /api/tasks ──────────────────────────────────────────────────

#[tokio::test]
async fn create_task_posts_payload_and_returns_task() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .and(body_json(json!({
            "title": "Write docs",
            "status_id": 1,
            "due_date": "2026-10-20",
            "assignee_id": 7
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 30,
            "title": "Write docs",
            "status_id": 1,
            "status": "To Do",
            "assignee_id": 7,
            "assignee_name": "Ada",
            "due_date": "2026-10-20",
            "updated_at": "2026-10-16T10:00:00Z"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut new_task = NewTask::new("Write docs", StatusId::new(1));
    new_task.due_date = NaiveDate::from_ymd_opt(2026, 10, 20);
    new_task.assignee_id = Some(UserId::new(7));

    let task = test_client(&mock_server).create_task(&new_task).await.unwrap();
    assert_eq!(task.id, TaskId::new(30));
    assert_eq!(task.assignee_label(), "Ada");
}

#[tokio::test]
async fn create_task_surfaces_validation_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/tasks"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({"detail": "Unknown status_id 9"})),
        )
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server)
        .create_task(&NewTask::new("x", StatusId::new(9)))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Unknown status_id 9");
    assert_eq!(err.kind(), ErrorKind::Http);
}

// ── PATCH /api/tasks/{id} ────────────────────────────────────────────

#[tokio::test]
async fn update_task_sends_tri_state_patch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/tasks/5"))
        .and(body_json(json!({"status_id": 3, "assignee_id": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_json(5, "Review PR", 3, "Done")))
        .expect(1)
        .mount(&mock_server)
        .await;

    let patch = TaskPatch {
        status_id: Some(StatusId::new(3)),
        assignee_id: Some(None),
        ..TaskPatch::default()
    };
    let task = test_client(&mock_server)
        .update_task(TaskId::new(5), &patch)
        .await
        .unwrap();
    assert_eq!(task.status_id, StatusId::new(3));
}

// ── DELETE /api/tasks/{id} ───────────────────────────────────────────

#[tokio::test]
async fn delete_task_accepts_no_content() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/tasks/5"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock_server)
        .await;

    test_client(&mock_server)
        .delete_task(TaskId::new(5))
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_task_ignores_a_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/api/tasks/6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"deleted": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    test_client(&mock_server)
        .delete_task(TaskId::new(6))
        .await
        .unwrap();
}

// ── GET /api/dashboard/summary ───────────────────────────────────────

#[tokio::test]
async fn dashboard_summary_sends_upcoming_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/dashboard/summary"))
        .and(query_param("upcoming_limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_tasks": 2,
            "by_status": [
                {"status_id": 1, "status": "To Do", "count": 1},
                {"status_id": 2, "status": "In Progress", "count": 1},
                {"status_id": 3, "status": "Done", "count": 0}
            ],
            "upcoming_deadlines": [task_json(1, "Plan", 1, "To Do")]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let summary = client
        .dashboard_summary(taskdash_client::DEFAULT_UPCOMING_LIMIT)
        .await
        .unwrap();
    assert_eq!(summary.total_tasks, 2);
    assert_eq!(summary.by_status.len(), 3);
    assert_eq!(summary.upcoming_deadlines.len(), 1);
}

// ── TaskApi seam ─────────────────────────────────────────────────────

async fn statuses_via_trait(api: &impl TaskApi) -> usize {
    api.list_statuses().await.map(|s| s.len()).unwrap_or(0)
}

#[tokio::test]
async fn trait_dispatch_reaches_the_same_endpoints() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/statuses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 1, "name": "To Do"}])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    assert_eq!(statuses_via_trait(&client).await, 1);
}
