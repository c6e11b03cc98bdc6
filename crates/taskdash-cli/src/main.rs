//! # taskdash CLI entry point
//!
//! Parses command-line arguments, resolves the API configuration and
//! dispatches to subcommand handlers on a single-threaded tokio runtime.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use taskdash_cli::dashboard::{run_dashboard, DashboardArgs};
use taskdash_cli::lookups::run_lookups;
use taskdash_cli::tasks::{run_tasks, TasksArgs};
use taskdash_client::config::{BASE_URL_VARS, TIMEOUT_VAR};
use taskdash_client::{ApiConfig, TaskClient};
use taskdash_store::{RefreshPolicy, TaskStore};

/// Task dashboard in the terminal.
///
/// Talks to the task API at the base URL given by `--api-base`, or
/// `TASKDASH_API_BASE` / `TASKDASH_BACKEND_URL`, or `http://localhost:3001`.
#[derive(Parser, Debug)]
#[command(name = "taskdash", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Base URL of the task API. Overrides the environment.
    #[arg(long, global = true, value_name = "URL")]
    api_base: Option<String>,

    /// Request timeout in seconds. Overrides the environment.
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Task totals, per-status counts and upcoming deadlines.
    Dashboard(DashboardArgs),

    /// List, show, create, update and delete tasks.
    Tasks(TasksArgs),

    /// Status and user lookup tables.
    Lookups,

    /// Print the resolved API configuration.
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let config = resolve_config(&cli)?;
    tracing::debug!(base_url = %config.base_url, "resolved API configuration");

    if let Commands::Config = cli.command {
        println!("base_url: {}", config.base_url);
        match config.timeout_secs {
            Some(secs) => println!("timeout:  {secs}s"),
            None => println!("timeout:  none"),
        }
        println!("sources:  --api-base, {}, {}", BASE_URL_VARS.join(", "), TIMEOUT_VAR);
        return Ok(0);
    }

    let client = TaskClient::new(config)?;
    let store = TaskStore::with_policy(client, RefreshPolicy::LatestRequestWins);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(async {
        match &cli.command {
            Commands::Dashboard(args) => run_dashboard(args, &store).await,
            Commands::Tasks(args) => run_tasks(args, &store).await,
            Commands::Lookups => run_lookups(&store).await,
            Commands::Config => Ok(0),
        }
    })
}

fn resolve_config(cli: &Cli) -> Result<ApiConfig> {
    let mut config = match &cli.api_base {
        Some(url) => ApiConfig::new(url)?,
        None => ApiConfig::from_env()?,
    };
    if let Some(secs) = cli.timeout {
        config = config.with_timeout_secs(secs);
    }
    Ok(config)
}
