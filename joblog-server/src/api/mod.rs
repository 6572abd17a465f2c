//! API Module
//!
//! HTTP API layer for the log server.
//! Each submodule handles endpoints for a specific domain.

pub mod error;
pub mod health;
pub mod logs;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, routing::get};
use joblog_store::RecordStore;
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    /// Upper bound on one listing; `None` waits for the store indefinitely
    pub read_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(store: Arc<dyn RecordStore>, read_timeout: Option<Duration>) -> Self {
        Self {
            store,
            read_timeout,
        }
    }
}

/// Create the main API router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Log endpoints
        .route("/api/v1/logs", get(logs::list_logs))
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
