//! HTTP handlers for the wine service.

pub mod chat;
pub mod feedback;
pub mod health;
pub mod keep_warm;
pub mod wines;
