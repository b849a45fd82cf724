use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub storage: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (code, status, storage) = match state.application_service.repository().ping().await {
        Ok(()) => (StatusCode::OK, "healthy", "connected".to_string()),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "unhealthy",
            format!("error: {}", e),
        ),
    };

    (
        code,
        Json(HealthResponse {
            status: status.to_string(),
            storage,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}
