//! Builds the prompts sent to chat providers.
//!
//! The provider only knows about the cellar through the system message, which
//! carries the whole inventory as JSON.

use crate::models::{ChatMessage, WineRecord};

const SOMMELIER_PREAMBLE: &str = "You are a wine expert helping a customer choose a wine.";

const RECOMMENDATION_RULES: &str = "\
When the user asks for a recommendation, recommend only wines from the list below. \
Always respond in the same language as the user's input. \
If the user is not asking about wine, hold a normal general conversation.";

/// Return `messages` with the inventory system message inserted at index 0.
///
/// Caller messages follow unchanged and in order. Output is deterministic for
/// a given inventory and input.
pub fn assemble(messages: Vec<ChatMessage>, inventory: &[WineRecord]) -> Vec<ChatMessage> {
    let mut conversation = Vec::with_capacity(messages.len() + 1);
    conversation.push(system_message(inventory));
    conversation.extend(messages);
    conversation
}

/// The system message embedding `inventory` as pretty-printed JSON.
pub fn system_message(inventory: &[WineRecord]) -> ChatMessage {
    ChatMessage::system(format!(
        "{}\n{}\n\nWine list:\n{}",
        SOMMELIER_PREAMBLE,
        RECOMMENDATION_RULES,
        to_json(inventory, true)
    ))
}

/// Single-turn prompt for the `/recommend` endpoint: the user's request
/// followed by the compact inventory.
pub fn assemble_recommendation(user_input: &str, inventory: &[WineRecord]) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(SOMMELIER_PREAMBLE),
        ChatMessage::user(format!(
            "{}. Can you recommend something from the wines in {}?",
            user_input.trim_end_matches('.'),
            to_json(inventory, false)
        )),
    ]
}

fn to_json(inventory: &[WineRecord], pretty: bool) -> String {
    let rendered = if pretty {
        serde_json::to_string_pretty(inventory)
    } else {
        serde_json::to_string(inventory)
    };
    // A slice of JSON objects always serializes.
    rendered.unwrap_or_else(|_| "[]".to_string())
}
