//! API routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, AppState};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health))
        // Reading ingestion
        .route("/api/v1/readings", post(handlers::ingest_reading))
        .with_state(state)
}
