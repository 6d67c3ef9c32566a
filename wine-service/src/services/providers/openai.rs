//! OpenAI chat completions, the primary provider.

use super::{completions_url, http_client, post_chat, ChatProvider, ProviderError};
use crate::config::ProviderConfig;
use crate::models::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

pub struct OpenAiProvider {
    config: ProviderConfig,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let client = http_client(config.timeout());
        Self { config, client }
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured("OPENAI_API_KEY is not set".into()));
        }

        let request = OpenAiRequest {
            model: &self.config.model,
            messages,
        };

        tracing::debug!(
            model = %self.config.model,
            message_count = messages.len(),
            "Sending request to OpenAI"
        );

        post_chat(
            &self.client,
            &completions_url(&self.config.base_url),
            &self.config.api_key,
            &request,
        )
        .await
    }
}
