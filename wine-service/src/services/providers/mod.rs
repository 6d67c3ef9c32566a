//! Chat completion providers.
//!
//! Both upstreams speak the OpenAI chat completions dialect and differ only in
//! endpoint, model and generation parameters, so each adapter builds its own
//! request body and shares the transport and reply extraction below.

pub mod deepseek;
pub mod mock;
pub mod openai;

use crate::models::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use service_core::error::AppError;
use service_core::observability::TracedClientExt;
use std::time::Duration;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {status}: {body}")]
    Api { status: u16, body: Value },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// The raw error object returned to HTTP callers.
    pub fn payload(&self) -> Value {
        match self {
            ProviderError::Api { status, body } => json!({ "status": status, "error": body }),
            ProviderError::NotConfigured(msg) => {
                json!({ "kind": "not_configured", "message": msg })
            }
            ProviderError::Network(msg) => json!({ "kind": "network", "message": msg }),
            ProviderError::MalformedResponse(msg) => {
                json!({ "kind": "malformed_response", "message": msg })
            }
        }
    }
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::upstream("Chat completion failed", err.payload())
    }
}

/// A chat completion backend: takes a full conversation, returns the reply.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError>;
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice.
    pub fn into_reply(self) -> Result<String, ProviderError> {
        self.choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::MalformedResponse("response has no choices".into()))?
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| {
                ProviderError::MalformedResponse("first choice has no message content".into())
            })
    }
}

pub(crate) fn http_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Falling back to default HTTP client");
            Client::new()
        })
}

/// POST `body` to `url` with bearer auth and extract the first reply.
pub(crate) async fn post_chat<B: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    api_key: &str,
    body: &B,
) -> Result<String, ProviderError> {
    let response = client
        .traced_post(url)
        .bearer_auth(api_key)
        .json(body)
        .send()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|e| ProviderError::Network(e.to_string()))?;

    if !status.is_success() {
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        return Err(ProviderError::Api {
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_slice::<ChatCompletionResponse>(&bytes)
        .map_err(|e| ProviderError::MalformedResponse(format!("failed to parse response: {}", e)))?
        .into_reply()
}

pub(crate) fn completions_url(base_url: &str) -> String {
    format!("{}/chat/completions", base_url.trim_end_matches('/'))
}
