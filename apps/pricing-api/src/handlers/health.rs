use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;
use tracing::warn;

use crate::AppState;

pub const SERVICE_NAME: &str = "pricing-api";

/// Liveness plus a reference data round-trip.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.reference.is_healthy().await {
        (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "service": SERVICE_NAME,
                "version": env!("CARGO_PKG_VERSION"),
                "database": "ok",
            })),
        )
    } else {
        warn!("Health check failed: reference data unavailable");
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "unhealthy",
                "service": SERVICE_NAME,
                "version": env!("CARGO_PKG_VERSION"),
                "database": "unavailable",
            })),
        )
    }
}
