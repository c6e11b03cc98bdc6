//! # Text Rendering
//!
//! Pure functions from store data to terminal text. Nothing here performs
//! I/O or reads the clock; callers pass `today` for the due-soon marker.

use std::fmt::Write;

use chrono::NaiveDate;
use taskdash_core::temporal::format_date;
use taskdash_core::{
    is_due_soon, kanban_columns, ordered_kpis, KanbanColumn, Status, Task, User,
};
use taskdash_store::StoreSnapshot;

/// Placeholder for an absent value.
const NONE: &str = "-";

/// Dashboard: total, one line per status KPI, then upcoming deadlines.
pub fn dashboard(snapshot: &StoreSnapshot, today: NaiveDate) -> String {
    let mut out = String::new();
    let summary = snapshot.dashboard.as_ref();

    let total = summary.map_or_else(|| NONE.to_string(), |s| s.total_tasks.to_string());
    let _ = writeln!(out, "Total tasks: {total}");
    for kpi in ordered_kpis(&snapshot.statuses, summary) {
        let accent = if kpi.is_accent() { " *" } else { "" };
        let _ = writeln!(out, "  {:<14} {}{accent}", kpi.name, kpi.count);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Upcoming deadlines");
    match summary.map(|s| s.upcoming_deadlines.as_slice()) {
        Some(upcoming) if !upcoming.is_empty() => out.push_str(&task_table(upcoming, today)),
        _ => {
            let _ = writeln!(out, "No upcoming deadlines found.");
        }
    }
    out
}

/// Tasks as a table with id, title, status, assignee and due columns.
pub fn task_list(tasks: &[Task], today: NaiveDate) -> String {
    if tasks.is_empty() {
        return "No tasks found for the selected filters.\n".to_string();
    }
    task_table(tasks, today)
}

/// Tasks grouped into kanban lanes. The "Other" lane is shown only when it
/// has tasks.
pub fn kanban(tasks: &[Task], today: NaiveDate) -> String {
    if tasks.is_empty() {
        return "No tasks found for the selected filters.\n".to_string();
    }
    let board = kanban_columns(tasks);
    let mut out = String::new();
    for column in KanbanColumn::ALL {
        let lane = board.column(column);
        if column == KanbanColumn::Other && lane.is_empty() {
            continue;
        }
        let _ = writeln!(out, "== {column} ({}) ==", lane.len());
        for task in lane {
            let _ = writeln!(
                out,
                "  #{:<4} {}  [{}] {}",
                task.id,
                task.title,
                task.assignee_label(),
                due_cell(task.due_date, today)
            );
        }
    }
    out
}

/// Every field of one task.
pub fn task_detail(task: &Task) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Task #{}", task.id);
    let _ = writeln!(out, "  Title:       {}", task.title);
    let _ = writeln!(
        out,
        "  Description: {}",
        task.description.as_deref().filter(|d| !d.is_empty()).unwrap_or(NONE)
    );
    let status = if task.status_name().is_empty() {
        task.status_id.to_string()
    } else {
        task.status_name().to_string()
    };
    let _ = writeln!(out, "  Status:      {status}");
    let _ = writeln!(out, "  Assignee:    {}", task.assignee_label());
    let _ = writeln!(
        out,
        "  Due:         {}",
        task.due_date.map_or_else(|| "No due date".to_string(), format_date)
    );
    if let Some(updated) = task.updated_at {
        let _ = writeln!(out, "  Updated:     {}", updated.format("%Y-%m-%d %H:%M UTC"));
    }
    out
}

/// Status and user lookup tables.
pub fn lookups(statuses: &[Status], users: &[User]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Statuses");
    for status in statuses {
        let _ = writeln!(out, "  {:>3}  {}", status.id, status.name);
    }
    let _ = writeln!(out, "Users");
    for user in users {
        match &user.email {
            Some(email) => {
                let _ = writeln!(out, "  {:>3}  {} <{email}>", user.id, user.name);
            }
            None => {
                let _ = writeln!(out, "  {:>3}  {}", user.id, user.name);
            }
        }
    }
    out
}

fn task_table(tasks: &[Task], today: NaiveDate) -> String {
    let title_width = tasks
        .iter()
        .map(|t| t.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("TITLE".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<5} {:<title_width$} {:<12} {:<16} DUE",
        "ID", "TITLE", "STATUS", "ASSIGNEE"
    );
    for task in tasks {
        let _ = writeln!(
            out,
            "{:<5} {:<title_width$} {:<12} {:<16} {}",
            task.id.to_string(),
            task.title,
            task.status_name(),
            task.assignee_label(),
            due_cell(task.due_date, today)
        );
    }
    out
}

fn due_cell(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => NONE.to_string(),
        Some(date) if is_due_soon(Some(date), today) => format!("{} (due soon)", format_date(date)),
        Some(date) => format_date(date),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskdash_core::{DashboardSummary, StatusCount, StatusId, TaskId, UserId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: i64, title: &str, status: &str, due: Option<NaiveDate>) -> Task {
        Task {
            id: TaskId::new(id),
            title: title.to_string(),
            description: None,
            status_id: StatusId::new(1),
            status: Some(status.to_string()),
            assignee_id: None,
            assignee_name: None,
            due_date: due,
            created_at: None,
            updated_at: None,
        }
    }

    const TODAY: (i32, u32, u32) = (2026, 10, 16);

    fn today() -> NaiveDate {
        date(TODAY.0, TODAY.1, TODAY.2)
    }

    #[test]
    fn list_marks_due_soon_and_unassigned() {
        let out = task_list(
            &[
                task(1, "Ship", "To Do", Some(date(2026, 10, 18))),
                task(2, "Later", "Done", Some(date(2026, 12, 1))),
                task(3, "Someday", "Done", None),
            ],
            today(),
        );
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("2026-10-18 (due soon)"));
        assert!(lines[1].contains("Unassigned"));
        assert!(lines[2].ends_with("2026-12-01"));
        assert!(lines[3].ends_with(" -"));
    }

    #[test]
    fn empty_list_has_a_message() {
        assert_eq!(
            task_list(&[], today()),
            "No tasks found for the selected filters.\n"
        );
    }

    #[test]
    fn kanban_hides_an_empty_other_lane() {
        let out = kanban(
            &[task(1, "a", "To Do", None), task(2, "b", "Done", None)],
            today(),
        );
        assert!(out.contains("== To Do (1) =="));
        assert!(out.contains("== In Progress (0) =="));
        assert!(out.contains("== Done (1) =="));
        assert!(!out.contains("Other"));

        let out = kanban(&[task(3, "c", "Blocked", None)], today());
        assert!(out.contains("== Other (1) =="));
    }

    #[test]
    fn dashboard_lists_kpis_in_lookup_order() {
        let snapshot = StoreSnapshot {
            statuses: vec![
                Status { id: StatusId::new(1), name: "To Do".into() },
                Status { id: StatusId::new(3), name: "Done".into() },
            ],
            dashboard: Some(DashboardSummary {
                total_tasks: 4,
                by_status: vec![StatusCount {
                    status_id: StatusId::new(3),
                    status: "Done".into(),
                    count: 4,
                }],
                upcoming_deadlines: vec![],
            }),
            ..StoreSnapshot::default()
        };
        let out = dashboard(&snapshot, today());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Total tasks: 4");
        assert!(lines[1].trim_start().starts_with("To Do"));
        assert!(lines[1].ends_with('0'));
        assert!(lines[2].ends_with("4 *"));
        assert!(out.contains("No upcoming deadlines found."));
    }

    #[test]
    fn dashboard_without_summary_shows_placeholder() {
        let out = dashboard(&StoreSnapshot::default(), today());
        assert!(out.starts_with("Total tasks: -\n"));
    }

    #[test]
    fn detail_shows_every_field() {
        let mut t = task(7, "Review", "In Progress", None);
        t.description = Some("check edge cases".into());
        t.assignee_name = Some("Ada".into());
        let out = task_detail(&t);
        assert!(out.starts_with("Task #7\n"));
        assert!(out.contains("Description: check edge cases"));
        assert!(out.contains("Status:      In Progress"));
        assert!(out.contains("Assignee:    Ada"));
        assert!(out.contains("Due:         No due date"));
    }

    #[test]
    fn lookups_render_ids_and_names() {
        let out = lookups(
            &[Status { id: StatusId::new(2), name: "In Progress".into() }],
            &[User {
                id: UserId::new(7),
                name: "Ada".into(),
                email: Some("ada@example.com".into()),
            }],
        );
        assert_eq!(
            out,
            "Statuses\n    2  In Progress\nUsers\n    7  Ada <ada@example.com>\n"
        );
    }
}
