//! HTTP surface.
//!
//! Axum router and server bootstrap. The handlers only map solver outcomes
//! onto the wire contract; all retry and challenge logic lives in
//! [`crate::solver`].

pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use log::info;
use tower_http::cors::CorsLayer;

use crate::solver::Solver;

/// Shared application state. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub solver: Arc<Solver>,
    pub instance: String,
}

/// Create the API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/", get(handlers::root))
        .route("/v1", post(handlers::solve))
}

/// Bind and serve until the process is stopped.
pub async fn serve(port: u16, state: AppState) -> anyhow::Result<()> {
    let app = Router::new()
        .merge(routes())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
