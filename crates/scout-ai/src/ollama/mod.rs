//! Ollama chat API client.
//!
//! Implements the `AiClient` trait against a locally-hosted Ollama
//! endpoint (`POST {base}/api/chat`), including tool calling via the
//! `tools` / `message.tool_calls` protocol.

mod api;
mod client;
mod config;

pub use client::OllamaClient;
pub use config::OllamaConfig;
