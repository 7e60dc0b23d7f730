//! HTTP server for geo-explorer
//!
//! Serves the map page and the JSON API that drives the selection session.

pub mod routes;
pub mod state;

use crate::config::Config;
use crate::describe::gemini::GeminiBackend;
use crate::error::{Error, Result};
use routes::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// Start the HTTP server on the configured address
///
/// Never returns unless the server shuts down.
pub async fn run(config: Config, static_dir: Option<PathBuf>) -> Result<()> {
    let addr = config.server_addr();
    run_on(&addr, config, static_dir).await
}

/// Start the HTTP server with a specific address
pub async fn run_on(addr: &str, config: Config, static_dir: Option<PathBuf>) -> Result<()> {
    let addr: SocketAddr = addr
        .parse()
        .map_err(|e| Error::Server(format!("Invalid server address: {}", e)))?;

    let backend = GeminiBackend::from_config(&config.gemini)?;
    if !backend.is_configured() {
        warn!("Gemini API key not configured; location details are unavailable");
    }

    let state = Arc::new(AppState::new(config, backend));

    let mut readiness = state.map_runtime.subscribe();
    tokio::spawn(async move {
        match readiness.ready().await {
            Ok(()) => info!("map loaded, accepting selections"),
            Err(e) => warn!("{}", e),
        }
    });

    let static_dir = routes::resolve_static_dir(static_dir);
    info!("Serving static files from {}", static_dir.display());
    let app = create_router(state, &static_dir);

    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| Error::Server(format!("Failed to bind to {}: {}", addr, e)))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Server(format!("Server error: {}", e)))?;

    Ok(())
}
