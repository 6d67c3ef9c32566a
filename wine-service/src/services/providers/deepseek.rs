//! DeepSeek chat completions, the secondary provider.
//!
//! Called as a plain HTTP POST with fixed sampling parameters.

use super::{completions_url, http_client, post_chat, ChatProvider, ProviderError};
use crate::config::ProviderConfig;
use crate::models::ChatMessage;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Serialize)]
struct DeepSeekRequest<'a> {
    messages: &'a [ChatMessage],
    model: &'a str,
    frequency_penalty: f32,
    max_tokens: u32,
    presence_penalty: f32,
    response_format: ResponseFormat,
    stop: Option<Value>,
    stream: bool,
    stream_options: Option<Value>,
    temperature: f32,
    top_p: f32,
    tools: Option<Value>,
    tool_choice: &'static str,
    logprobs: bool,
    top_logprobs: Option<u32>,
}

impl<'a> DeepSeekRequest<'a> {
    fn new(model: &'a str, messages: &'a [ChatMessage]) -> Self {
        Self {
            messages,
            model,
            frequency_penalty: 0.0,
            max_tokens: 2048,
            presence_penalty: 0.0,
            response_format: ResponseFormat { kind: "text" },
            stop: None,
            stream: false,
            stream_options: None,
            temperature: 1.0,
            top_p: 1.0,
            tools: None,
            tool_choice: "none",
            logprobs: false,
            top_logprobs: None,
        }
    }
}

pub struct DeepSeekProvider {
    config: ProviderConfig,
    client: Client,
}

impl DeepSeekProvider {
    pub fn new(config: ProviderConfig) -> Self {
        let client = http_client(config.timeout());
        Self { config, client }
    }
}

#[async_trait]
impl ChatProvider for DeepSeekProvider {
    fn name(&self) -> &'static str {
        "deepseek"
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured("DEEPSEEK_API_KEY is not set".into()));
        }

        let request = DeepSeekRequest::new(&self.config.model, messages);

        tracing::debug!(
            model = %self.config.model,
            message_count = messages.len(),
            "Sending request to DeepSeek"
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
