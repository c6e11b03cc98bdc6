//! # Tasks Subcommand
//!
//! Task list, detail and mutation commands.
//!
//! ## Subcommands
//!
//! - `list`: Filtered task list, as a kanban board (default) or a table.
//! - `show`: One task with every field.
//! - `create`: Create a task from flags.
//! - `update`: Edit a task. Flags not given keep the task's current values.
//! - `delete`: Delete a task.
//!
//! Create and update go through the same validation as the dashboard form:
//! a blank title is rejected before any request is sent.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};

use taskdash_client::TaskApi;
use taskdash_core::temporal::{self, parse_date};
use taskdash_core::{StatusId, TaskDraft, TaskFilters, TaskId, UserId};
use taskdash_store::{workflow, TaskStore};

use crate::render;

/// Arguments for the `taskdash tasks` subcommand.
#[derive(Args, Debug)]
pub struct TasksArgs {
    #[command(subcommand)]
    pub command: TasksCommand,
}

/// Task subcommands.
#[derive(Subcommand, Debug)]
pub enum TasksCommand {
    /// List tasks matching the filters.
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// Layout of the listing.
        #[arg(long, value_enum, default_value_t = View::Kanban)]
        view: View,
    },

    /// Show one task.
    Show {
        /// Task id.
        id: TaskId,
    },

    /// Create a task.
    Create {
        /// Task title (required, must not be blank).
        #[arg(long)]
        title: String,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Update a task. Unspecified fields keep their current values.
    Update {
        /// Task id.
        id: TaskId,
        /// New title.
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: FieldArgs,
        /// Remove the description.
        #[arg(long, conflicts_with = "description")]
        clear_description: bool,
        /// Unassign the task.
        #[arg(long, conflicts_with = "assignee")]
        unassign: bool,
        /// Remove the due date.
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
    },

    /// Delete a task.
    Delete {
        /// Task id.
        id: TaskId,
    },
}

/// Task list filters. Omitted filters are not sent.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Only tasks in this status id.
    #[arg(long = "status", value_name = "STATUS_ID")]
    pub status_filter: Option<StatusId>,
    /// Only tasks assigned to this user id.
    #[arg(long = "assignee", value_name = "USER_ID")]
    pub assignee_filter: Option<UserId>,
    /// Only tasks due on or before this date (YYYY-MM-DD).
    #[arg(long, value_parser = parse_date, value_name = "DATE")]
    pub due_before: Option<NaiveDate>,
}

impl FilterArgs {
    /// Filters for the task list endpoint.
    pub fn to_filters(&self) -> TaskFilters {
        TaskFilters {
            status_id: self.status_filter,
            assignee_id: self.assignee_filter,
            due_before: self.due_before,
        }
    }
}

/// Editable task fields other than the title.
#[derive(Args, Debug, Default)]
pub struct FieldArgs {
    /// Description text.
    #[arg(long)]
    pub description: Option<String>,
    /// Status id (defaults to 1 for new tasks).
    #[arg(long)]
    pub status: Option<StatusId>,
    /// Assignee user id.
    #[arg(long)]
    pub assignee: Option<UserId>,
    /// Due date (YYYY-MM-DD).
    #[arg(long)]
    pub due: Option<String>,
}

impl FieldArgs {
    /// Overlay the given fields onto a draft.
    pub fn apply(&self, draft: &mut TaskDraft) {
        if let Some(description) = &self.description {
            draft.description = description.clone();
        }
        if let Some(status) = self.status {
            draft.status_id = Some(status);
        }
        if let Some(assignee) = self.assignee {
            draft.assignee_id = Some(assignee);
        }
        if let Some(due) = &self.due {
            draft.due_date = due.clone();
        }
    }
}

/// Listing layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    /// Lanes per status.
    Kanban,
    /// One row per task.
    List,
}

/// Execute the tasks subcommand.
pub async fn run_tasks<A: TaskApi>(args: &TasksArgs, store: &TaskStore<A>) -> Result<u8> {
    match &args.command {
        TasksCommand::List { filters, view } => {
            workflow::open_tasks_page(store, &filters.to_filters()).await?;
            let snapshot = store.snapshot();
            let today = temporal::today();
            let out = match view {
                View::Kanban => render::kanban(&snapshot.tasks, today),
                View::List => render::task_list(&snapshot.tasks, today),
            };
            print!("{out}");
            Ok(0)
        }
        TasksCommand::Show { id } => {
            let task = store
                .api()
                .get_task(*id)
                .await
                .with_context(|| format!("could not load task {id}"))?;
            print!("{}", render::task_detail(&task));
            Ok(0)
        }
        TasksCommand::Create { title, fields } => {
            let mut draft = TaskDraft {
                title: title.clone(),
                ..TaskDraft::new()
            };
            fields.apply(&mut draft);
            let task = workflow::save_task(store, None, &draft, &TaskFilters::all()).await?;
            println!("Created task #{}", task.id);
            print!("{}", render::task_detail(&task));
            Ok(0)
        }
        TasksCommand::Update {
            id,
            title,
            fields,
            clear_description,
            unassign,
            clear_due,
        } => {
            let current = store
                .api()
                .get_task(*id)
                .await
                .with_context(|| format!("could not load task {id}"))?;
            let draft = edit_draft(
                TaskDraft::from_task(&current),
                title.as_deref(),
                fields,
                EditClears {
                    description: *clear_description,
                    assignee: *unassign,
                    due: *clear_due,
                },
            );
            let task = workflow::save_task(store, Some(*id), &draft, &TaskFilters::all()).await?;
            println!("Updated task #{}", task.id);
            print!("{}", render::task_detail(&task));
            Ok(0)
        }
        TasksCommand::Delete { id } => {
            workflow::delete_task(store, *id, &TaskFilters::all()).await?;
            println!("Deleted task #{id}");
            Ok(0)
        }
    }
}

/// Optional fields the user asked to clear.
#[derive(Debug, Clone, Copy, Default)]
struct EditClears {
    description: bool,
    assignee: bool,
    due: bool,
}

fn edit_draft(
    mut draft: TaskDraft,
    title: Option<&str>,
    fields: &FieldArgs,
    clears: EditClears,
) -> TaskDraft {
    if let Some(title) = title {
        draft.title = title.to_string();
    }
    fields.apply(&mut draft);
    if clears.description {
        draft.description.clear();
    }
    if clears.assignee {
        draft.assignee_id = None;
    }
    if clears.due {
        draft.due_date.clear();
    }
    draft
}
