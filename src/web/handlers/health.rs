//! # Health Check Handlers

use axum::Json;
use serde::Serialize;

/// Basic health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
}

/// Basic health check endpoint: GET /health
///
/// Returns OK whenever the process is serving requests. Store connectivity is
/// not probed.
pub async fn basic_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}
