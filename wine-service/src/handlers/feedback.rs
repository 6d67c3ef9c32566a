use axum::{extract::State, Json};
use service_core::error::AppError;

use super::wines::SaveResponse;
use crate::models::FeedbackRecord;
use crate::startup::AppState;

#[tracing::instrument(skip(state, feedback))]
pub async fn add_feedback(
    State(state): State<AppState>,
    Json(feedback): Json<FeedbackRecord>,
) -> Result<Json<SaveResponse>, AppError> {
    tracing::info!(fields = feedback.len(), "Recording feedback");

    let received = state.store.insert_feedback(feedback).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to insert feedback");
        e
    })?;

    Ok(Json(SaveResponse::saved(received)))
}
