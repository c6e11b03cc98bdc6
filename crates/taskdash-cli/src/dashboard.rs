//! # Dashboard Subcommand
//!
//! Loads lookups and the dashboard summary, then prints the total, one KPI
//! line per status (completed statuses marked `*`) and the upcoming
//! deadlines table.

use anyhow::Result;
use clap::Args;

use taskdash_client::TaskApi;
use taskdash_core::{temporal, DEFAULT_UPCOMING_LIMIT};
use taskdash_store::{workflow, TaskStore};

use crate::render;

/// Arguments for the `taskdash dashboard` subcommand.
#[derive(Args, Debug)]
pub struct DashboardArgs {
    /// Maximum number of upcoming deadlines to show.
    #[arg(long, default_value_t = DEFAULT_UPCOMING_LIMIT)]
    pub limit: u32,
}

/// Execute the dashboard subcommand.
pub async fn run_dashboard<A: TaskApi>(args: &DashboardArgs, store: &TaskStore<A>) -> Result<u8> {
    workflow::open_dashboard_page(store, args.limit).await?;
    print!("{}", render::dashboard(&store.snapshot(), temporal::today()));
    Ok(0)
}
