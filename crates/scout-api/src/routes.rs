//! Request handlers for both endpoint variants.
//!
//! `/v1/chat` lets the model pick tools via the orchestration loop;
//! `/v1/chat/simple` guesses the subject heuristically and queries both
//! sources unconditionally. Either way the caller gets the same response
//! shape, and failures are always a normal JSON body, never a bare status.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use tracing::info;

use scout_ai::{ChatOutcome, Session, ToolPayload};
use scout_common::{ChatRequest, ChatResponse, PlayerData};

use crate::extract::extract_subject;
use crate::server::AppState;

const EMPTY_MESSAGE: &str = "No message provided.";

/// Tool-calling variant: the model decides which tools to invoke.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    if req.message.trim().is_empty() {
        return Json(ChatResponse::failure(EMPTY_MESSAGE));
    }

    info!(chars = req.message.len(), "chat request");

    let mut session = Session::new()
        .with_system_prompt(state.system_prompt.clone())
        .with_tools(state.tools.clone())
        .with_max_tool_rounds(state.max_tool_rounds);

    let outcome = session
        .chat(state.client.as_ref(), state.executor.as_ref(), req.message)
        .await;

    Json(response_from_outcome(outcome))
}

/// Heuristic variant: guess the subject, call both sources unconditionally,
/// answer from a fixed template.
pub async fn chat_simple(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Json<ChatResponse> {
    if req.message.trim().is_empty() {
        return Json(ChatResponse::failure(EMPTY_MESSAGE));
    }

    let subject = extract_subject(&req.message);
    info!(subject = %subject, "simple chat request");

    let arguments = serde_json::json!({ "player_name": subject });
    let sports = state.executor.execute("search_sportsdb", &arguments).await;
    let wiki = state.executor.execute("search_wikipedia", &arguments).await;

    let data = PlayerData {
        sports: sports.payload.data().cloned(),
        wiki: wiki.payload.data().cloned(),
    };

    if data.is_empty() {
        return Json(ChatResponse::failure(format!(
            "Sorry, no information was found for \"{subject}\". \
             Try the player's full name or a different spelling."
        )));
    }

    let display_name = data
        .sports
        .as_ref()
        .and_then(|s| s["strPlayer"].as_str())
        .or_else(|| data.wiki.as_ref().and_then(|w| w["title"].as_str()))
        .unwrap_or(&subject)
        .to_string();

    Json(ChatResponse::ok(
        format!("Here is what I found about {display_name}:"),
        data,
    ))
}

fn response_from_outcome(outcome: ChatOutcome) -> ChatResponse {
    let data = PlayerData {
        sports: payload_data(&outcome.results, "search_sportsdb"),
        wiki: payload_data(&outcome.results, "search_wikipedia"),
    };

    ChatResponse {
        success: outcome.success,
        message: outcome.message,
        data: if data.is_empty() { None } else { Some(data) },
    }
}

fn payload_data(
    results: &HashMap<String, ToolPayload>,
    tool: &str,
) -> Option<serde_json::Value> {
    results.get(tool).and_then(ToolPayload::data).cloned()
}
