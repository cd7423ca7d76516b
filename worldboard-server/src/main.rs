mod routes;
mod singleton;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;
use worldboard_core::WorldboardConfig;

use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = WorldboardConfig::load()?;
    let _lock = singleton::StoreLock::acquire(&config.store_path(), config.port)?;

    let state = AppState::new(&config)?;

    // The loading overlay goes away once the country data is in, or when the
    // fallback timer fires.
    let gate = state.dashboard.lock().await.loading().clone();
    let fallback = config.loading_timeout();
    tokio::spawn(async move {
        let dismissal = gate.wait(fallback).await;
        tracing::debug!(?dismissal, "loading overlay dismissed");
    });

    let init_state = state.clone();
    tokio::spawn(async move {
        init_state.init().await;
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = routes::router().with_state(state).layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    tracing::info!("worldboard-server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
