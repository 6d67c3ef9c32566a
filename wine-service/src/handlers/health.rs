use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::startup::AppState;

/// Plain-text liveness check.
pub async fn index() -> &'static str {
    "Wine service is up and running!"
}

/// Health check including the database round trip.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let wine_count = state.inventory.len();
    let last_refreshed = state.inventory.last_refreshed();
    let keep_warm = state.keep_warm.is_running();

    match state.store.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "service": "wine-service",
                "version": env!("CARGO_PKG_VERSION"),
                "wineCount": wine_count,
                "lastRefreshed": last_refreshed,
                "keepWarm": keep_warm,
            })),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Store health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "service": "wine-service",
                    "error": e.to_string(),
                    "wineCount": wine_count,
                    "keepWarm": keep_warm,
                })),
            )
        }
    }
}
