//! HTTP endpoints for the two research stages
//!
//! - `POST /api/generate-segments` `{industry}` -> `{result}`
//! - `POST /api/enhance-segments` `{industry, segments}` -> `{result}`
//! - `GET /health`
//!
//! Failures always come back as `{error, details}`: 400 for invalid input,
//! 500 for everything downstream.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use eyre::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use crate::research::SegmentService;

mod handlers;

pub use handlers::error_response;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<dyn SegmentService>,
}

impl AppState {
    pub fn new(service: Arc<dyn SegmentService>) -> Self {
        Self { service }
    }
}

/// Build the router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate-segments", post(handlers::generate_segments))
        .route("/api/enhance-segments", post(handlers::enhance_segments))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Serve on `addr` until Ctrl-C
pub async fn run(state: AppState, addr: &str) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {}", addr))?;
    info!("Listening on {}", listener.local_addr()?);
    serve(listener, state).await
}

/// Serve on an already bound listener until Ctrl-C
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown requested");
        })
        .await
        .context("Server error")?;
    Ok(())
}
