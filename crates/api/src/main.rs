//! HTTP API server for the Murmur chat service.
//!
//! Thin JSON layer over the orchestrator and the conversation store.
//! Generated images are served statically under `/media`.

mod auth;
mod config;
mod error;
mod routes;
mod state;

use std::sync::Arc;

use database::Database;
use orchestrator::Orchestrator;
use tower_http::services::ServeDir;
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting API server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Wire the orchestrator and its backends from the environment
    let orchestrator = Arc::new(Orchestrator::from_env(db.clone()));
    let media_root = orchestrator.media_root().to_path_buf();

    // Build application state
    let state = AppState::new(db, orchestrator);

    // Build router
    let app = routes::router()
        .nest_service(orchestrator::MEDIA_MOUNT, ServeDir::new(media_root))
        .with_state(state);

    // Start server
    info!(addr = %config.addr, "API server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
