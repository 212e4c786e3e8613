//! Conversation session management.
//!
//! A `Session` holds the conversation history (messages) for one request
//! and orchestrates the bounded tool-call loop.

mod chat;
mod manager;
mod types;

pub use manager::Session;
pub use types::{ChatOutcome, ToolExecutor, ToolOutcome, ToolPayload};
