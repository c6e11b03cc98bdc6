//! # Lookups Subcommand
//!
//! Prints the status and user lookup tables, for picking ids to pass to
//! `tasks` filters and fields.

use anyhow::Result;

use taskdash_client::TaskApi;
use taskdash_store::TaskStore;

use crate::render;

/// Execute the lookups subcommand.
pub async fn run_lookups<A: TaskApi>(store: &TaskStore<A>) -> Result<u8> {
    store.bootstrap().await?;
    let snapshot = store.snapshot();
    print!("{}", render::lookups(&snapshot.statuses, &snapshot.users));
    Ok(0)
}
