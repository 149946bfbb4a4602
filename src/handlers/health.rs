use axum::Json;
use tracing::debug;

use crate::models::{HealthResponse, ReadyResponse};

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Health check requested");
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Collaboration server is running".to_string(),
    })
}

/// Readiness check endpoint
pub async fn ready_check() -> Json<ReadyResponse> {
    debug!("Readiness check requested");
    // Room state is in-process; once the server is up it is ready.
    Json(ReadyResponse {
        status: "ok".to_string(),
        message: "Service is ready".to_string(),
    })
}
