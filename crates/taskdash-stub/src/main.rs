//! Task API stub server, standalone development binary.
//!
//! Storage is in-memory (DashMap) with no persistence; a few sample tasks are
//! seeded at startup.

use std::net::SocketAddr;

use taskdash_stub::{router, AppState, DEFAULT_PORT, PORT_VAR};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::var(PORT_VAR)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let state = AppState::with_sample_tasks();
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("taskdash-stub listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await
}
