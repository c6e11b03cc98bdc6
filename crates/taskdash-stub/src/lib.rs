//! In-memory task API stub server.
//!
//! Implements the REST endpoints that `taskdash-client` calls, backed by a
//! DashMap store seeded with the status and user lookups. Used by the
//! workspace's integration tests and for local development without a real
//! backend. Data is lost on restart.

pub mod error;
pub mod routes;
pub mod store;

use std::net::SocketAddr;

pub use error::ApiProblem;
pub use routes::router;
pub use store::{AppState, TaskQuery};

/// Environment variable holding the port the binary listens on.
pub const PORT_VAR: &str = "TASKDASH_STUB_PORT";

/// Port used when [`PORT_VAR`] is unset or invalid.
pub const DEFAULT_PORT: u16 = 3001;

/// Serve `state` on an ephemeral loopback port in a background task and
/// return the bound address.
pub async fn spawn(state: AppState) -> std::io::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router(state).into_make_service()).await {
            tracing::error!(error = %e, "stub server stopped");
        }
    });
    Ok(addr)
}
