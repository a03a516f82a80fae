//! API handlers for the HTTP REST API

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;

use crate::alerting::WebhookNotifier;
use crate::error::{Error, StoreError};
use crate::ingest::Ingestor;
use crate::store::{PgReadingStore, PostgresPool};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// The ingestion pipeline
    pub ingestor: Arc<Ingestor<PgReadingStore, WebhookNotifier>>,
    /// Pool handle for health checks
    pub postgres: PostgresPool,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall status: "ok" or "degraded"
    pub status: &'static str,
    /// Crate version
    pub version: &'static str,
}

/// Health check endpoint, including store connectivity
pub async fn health(State(state): State<AppState>) -> Response {
    match state.postgres.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok",
                version: env!("CARGO_PKG_VERSION"),
            }),
        )
            .into_response(),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "degraded",
                version: env!("CARGO_PKG_VERSION"),
            }),
        )
            .into_response(),
    }
}

/// Successful ingestion response: echo of the stored record
#[derive(Serialize)]
pub struct IngestSuccessResponse {
    /// Always "success"
    pub status: &'static str,
    /// Device that reported the reading
    pub device_id: String,
    /// Resolved timestamp, ISO-8601
    pub timestamp: String,
    /// Stored glucose level in mg/dL
    pub glucose_level: f64,
}

/// Failed ingestion response
#[derive(Serialize)]
pub struct IngestErrorResponse {
    /// Always "error"
    pub status: &'static str,
    /// Human-readable failure reason
    pub error: String,
}

/// Ingest a single reading.
///
/// The body is the raw device payload; the core decides success or failure
/// and this layer only maps the outcome onto HTTP.
pub async fn ingest_reading(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    match state.ingestor.ingest(&payload).await {
        Ok(receipt) => (
            StatusCode::OK,
            Json(IngestSuccessResponse {
                status: "success",
                device_id: receipt.device_id,
                timestamp: receipt.recorded_at.to_rfc3339(),
                glucose_level: receipt.glucose_mg_dl,
            }),
        )
            .into_response(),
        Err(e) => (
            status_for(&e),
            Json(IngestErrorResponse {
                status: "error",
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

/// HTTP status for each failure kind; transport detail only, the JSON body
/// carries the contract.
fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
        Error::Store(StoreError::Rejected(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
