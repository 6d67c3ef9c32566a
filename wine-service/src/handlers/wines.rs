use axum::{extract::State, Json};
use serde::Serialize;
use service_core::error::AppError;
use std::sync::Arc;

use crate::models::{Record, WineRecord};
use crate::startup::AppState;

#[derive(Debug, Serialize)]
pub struct WineListResponse {
    #[serde(rename = "wineList")]
    pub wine_list: Arc<Vec<WineRecord>>,
}

/// Response for inserts: the rows as stored, server-assigned fields included.
#[derive(Debug, Serialize)]
pub struct SaveResponse {
    pub message: String,
    pub received: Vec<Record>,
}

impl SaveResponse {
    pub fn saved(received: Vec<Record>) -> Self {
        Self {
            message: "Saved".to_string(),
            received,
        }
    }
}

/// Serve the cached inventory.
pub async fn list_wines(State(state): State<AppState>) -> Json<WineListResponse> {
    let wine_list = state.inventory.read();
    tracing::debug!(count = wine_list.len(), "Serving cached wine list");
    Json(WineListResponse { wine_list })
}

#[tracing::instrument(skip(state, wine))]
pub async fn add_wine(
    State(state): State<AppState>,
    Json(wine): Json<WineRecord>,
) -> Result<Json<SaveResponse>, AppError> {
    tracing::info!(fields = wine.len(), "Adding wine");

    let received = state.store.insert_wine(wine).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to insert wine");
        e
    })?;

    // Keep /wineList and the chat prompts in step with the new row.
    let _ = state.inventory.refresh().await;

    Ok(Json(SaveResponse::saved(received)))
}
