//! Mock provider for testing.

use super::{ChatProvider, ProviderError};
use crate::models::ChatMessage;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

/// Replies with a fixed text (or fails) and remembers every conversation.
pub struct MockChatProvider {
    name: &'static str,
    reply: Result<String, Value>,
    received: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockChatProvider {
    pub fn replying(name: &'static str, reply: impl Into<String>) -> Self {
        Self {
            name,
            reply: Ok(reply.into()),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Every call fails with an API error carrying `body`.
    pub fn failing(name: &'static str, body: Value) -> Self {
        Self {
            name,
            reply: Err(body),
            received: Mutex::new(Vec::new()),
        }
    }

    /// Conversations received so far, oldest first.
    pub fn received(&self) -> Vec<Vec<ChatMessage>> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ProviderError> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(messages.to_vec());

        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(body) => Err(ProviderError::Api {
                status: 500,
                body: body.clone(),
            }),
        }
    }
}
