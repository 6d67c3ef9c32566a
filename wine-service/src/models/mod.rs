//! Domain models for the wine service.

pub mod conversation;
pub mod record;

pub use conversation::{ChatMessage, Role};
pub use record::{FeedbackRecord, Record, WineRecord};
