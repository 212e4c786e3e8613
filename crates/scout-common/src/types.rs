//! Wire types for the chat endpoint.
//!
//! Both variants of the endpoint (tool-calling and heuristic) speak the
//! same request/response shape, so the types live here rather than in the
//! server crate.

use serde::{Deserialize, Serialize};

/// Inbound request body: one free-text user turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// Raw data fetched from the external collaborators, grouped by source.
///
/// A `None` slot means that source returned no match for this request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerData {
    pub sports: Option<serde_json::Value>,
    pub wiki: Option<serde_json::Value>,
}

impl PlayerData {
    pub fn is_empty(&self) -> bool {
        self.sports.is_none() && self.wiki.is_none()
    }
}

/// Outbound response body, shared by both endpoint variants.
///
/// `data` is `null` whenever no collaborator produced anything, so clients
/// can branch on it without inspecting the slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub success: bool,
    pub message: String,
    pub data: Option<PlayerData>,
}

impl ChatResponse {
    pub fn ok(message: impl Into<String>, data: PlayerData) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}
