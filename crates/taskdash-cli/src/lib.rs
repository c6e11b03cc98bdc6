//! # taskdash-cli
//!
//! Library crate for the `taskdash` command. Each subcommand module exposes
//! its clap arguments and an async `run_*` handler that drives a
//! [`taskdash_store::TaskStore`]. Output formatting lives in [`render`] and is
//! pure, so it is tested without a backend.

pub mod dashboard;
pub mod lookups;
pub mod render;
pub mod tasks;
