//! Provider-backed chat endpoints.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;

use crate::models::ChatMessage;
use crate::services::conversation;
use crate::services::ChatProvider;
use crate::startup::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(rename = "userInput")]
    pub user_input: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub result: String,
}

pub async fn openai_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let conversation = conversation::assemble(request.messages, &state.inventory.read());
    relay(state.openai.as_ref(), &conversation).await
}

pub async fn deepseek_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let conversation = conversation::assemble(request.messages, &state.inventory.read());
    relay(state.deepseek.as_ref(), &conversation).await
}

/// Single question in, single recommendation out, via the primary provider.
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let conversation =
        conversation::assemble_recommendation(&request.user_input, &state.inventory.read());
    relay(state.openai.as_ref(), &conversation).await
}

async fn relay(
    provider: &dyn ChatProvider,
    conversation: &[ChatMessage],
) -> Result<Json<ChatResponse>, AppError> {
    tracing::info!(
        provider = provider.name(),
        message_count = conversation.len(),
        "Relaying conversation"
    );

    let result = provider.complete(conversation).await.map_err(|e| {
        tracing::error!(provider = provider.name(), error = %e, "Chat completion failed");
        e
    })?;

    tracing::debug!(provider = provider.name(), reply_len = result.len(), "Received reply");
    Ok(Json(ChatResponse { result }))
}
