//! # Board Derivations
//!
//! Pure functions that turn fetched collections into what the views display:
//! status grouping, kanban lanes, the due-soon highlight and dashboard KPIs.
//! Input order is preserved everywhere; nothing here sorts tasks.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;

use crate::identity::StatusId;
use crate::model::{DashboardSummary, Status, Task};
use crate::temporal::days_until;

/// A due date at most this many calendar days away counts as due soon.
pub const DUE_SOON_DAYS: i64 = 3;

/// Group tasks by their status reference.
pub fn group_by_status(tasks: &[Task]) -> BTreeMap<StatusId, Vec<Task>> {
    let mut groups: BTreeMap<StatusId, Vec<Task>> = BTreeMap::new();
    for task in tasks {
        groups.entry(task.status_id).or_default().push(task.clone());
    }
    groups
}

/// Visual lane of the kanban board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KanbanColumn {
    /// Status names containing "to do".
    ToDo,
    /// Status names containing "progress".
    InProgress,
    /// Status names containing "done".
    Done,
    /// Anything else, including tasks without a status name.
    Other,
}

impl KanbanColumn {
    /// Columns in display order.
    pub const ALL: [KanbanColumn; 4] = [Self::ToDo, Self::InProgress, Self::Done, Self::Other];

    /// Lane for a status name, matched case-insensitively.
    pub fn for_status_name(name: &str) -> Self {
        let lowered = name.to_lowercase();
        if lowered.contains("to do") {
            Self::ToDo
        } else if lowered.contains("progress") {
            Self::InProgress
        } else if lowered.contains("done") {
            Self::Done
        } else {
            Self::Other
        }
    }

    /// Column heading.
    pub fn title(self) -> &'static str {
        match self {
            Self::ToDo => "To Do",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for KanbanColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Tasks split into kanban lanes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KanbanBoard {
    /// "To Do" lane.
    pub todo: Vec<Task>,
    /// "In Progress" lane.
    pub in_progress: Vec<Task>,
    /// "Done" lane.
    pub done: Vec<Task>,
    /// Unrecognized statuses.
    pub other: Vec<Task>,
}

impl KanbanBoard {
    /// Tasks in a lane.
    pub fn column(&self, column: KanbanColumn) -> &[Task] {
        match column {
            KanbanColumn::ToDo => &self.todo,
            KanbanColumn::InProgress => &self.in_progress,
            KanbanColumn::Done => &self.done,
            KanbanColumn::Other => &self.other,
        }
    }

    fn column_mut(&mut self, column: KanbanColumn) -> &mut Vec<Task> {
        match column {
            KanbanColumn::ToDo => &mut self.todo,
            KanbanColumn::InProgress => &mut self.in_progress,
            KanbanColumn::Done => &mut self.done,
            KanbanColumn::Other => &mut self.other,
        }
    }

    /// Total number of tasks across lanes.
    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.done.len() + self.other.len()
    }

    /// Whether every lane is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Split tasks into kanban lanes by their denormalized status name.
pub fn kanban_columns(tasks: &[Task]) -> KanbanBoard {
    let mut board = KanbanBoard::default();
    for task in tasks {
        board
            .column_mut(KanbanColumn::for_status_name(task.status_name()))
            .push(task.clone());
    }
    board
}

/// Whether a due date should be highlighted. Overdue dates count.
pub fn is_due_soon(due_date: Option<NaiveDate>, today: NaiveDate) -> bool {
    due_date.is_some_and(|due| days_until(due, today) <= DUE_SOON_DAYS)
}

/// One dashboard KPI tile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Kpi {
    /// Status the tile counts.
    pub status_id: StatusId,
    /// Tile label.
    pub name: String,
    /// Number of tasks.
    pub count: u64,
}

impl Kpi {
    /// Completed-work tiles get an accent.
    pub fn is_accent(&self) -> bool {
        self.name.to_lowercase().contains("done")
    }
}

/// KPI tiles in lookup order, falling back to the summary's own order when
/// the status lookup has not been loaded.
pub fn ordered_kpis(statuses: &[Status], summary: Option<&DashboardSummary>) -> Vec<Kpi> {
    let by_status = summary.map(|s| s.by_status.as_slice()).unwrap_or_default();

    if statuses.is_empty() {
        return by_status
            .iter()
            .map(|entry| Kpi {
                status_id: entry.status_id,
                name: entry.status.clone(),
                count: entry.count,
            })
            .collect();
    }

    let counts: HashMap<StatusId, u64> = by_status
        .iter()
        .map(|entry| (entry.status_id, entry.count))
        .collect();

    statuses
        .iter()
        .map(|status| Kpi {
            status_id: status.id,
            name: status.name.clone(),
            count: counts.get(&status.id).copied().unwrap_or(0),
        })
        .collect()
}
