//! Ollama client struct, request building, and response parsing.

use crate::tools::to_ollama_tool;
use crate::{AiError, AiResponse, Message, Role, ToolCall, ToolDefinition};

use super::config::OllamaConfig;

/// Ollama chat API client.
pub struct OllamaClient {
    pub(crate) config: OllamaConfig,
    pub(crate) http: reqwest::Client,
}

impl OllamaClient {
    pub fn new(config: OllamaConfig) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .expect("failed to build HTTP client");
        Self { config, http }
    }

    pub(crate) fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.base_url.trim_end_matches('/'))
    }

    /// Build the JSON request body for the chat endpoint.
    pub(crate) fn build_request_body(
        &self,
        messages: &[Message],
        tools: &[ToolDefinition],
    ) -> serde_json::Value {
        let mut msgs = Vec::new();

        // The conversation is expected to open with its system turn; fall
        // back to the configured prompt when the caller didn't provide one.
        let has_system = messages.first().map(|m| m.role == Role::System).unwrap_or(false);
        if !has_system {
            if let Some(ref system) = self.config.system_prompt {
                msgs.push(serde_json::json!({
                    "role": "system",
                    "content": system,
                }));
            }
        }

        for msg in messages {
            let mut entry = serde_json::json!({
                "role": msg.role.as_str(),
                "content": msg.content,
            });
            if !msg.tool_calls.is_empty() {
                let calls: Vec<_> = msg
                    .tool_calls
                    .iter()
                    .map(|call| {
                        serde_json::json!({
                            "function": {
                                "name": call.name,
                                "arguments": call.arguments,
                            }
                        })
                    })
                    .collect();
                entry["tool_calls"] = serde_json::json!(calls);
            }
            msgs.push(entry);
        }

        let mut body = serde_json::json!({
            "model": self.config.model,
            "messages": msgs,
            "stream": false,
            "options": {
                "temperature": self.config.temperature,
                "num_predict": self.config.num_predict,
            },
        });

        if !tools.is_empty() {
            let tool_defs: Vec<_> = tools.iter().map(to_ollama_tool).collect();
            body["tools"] = serde_json::json!(tool_defs);
        }

        body
    }

    /// Parse a non-streaming chat response.
    pub(crate) fn parse_response(&self, json: serde_json::Value) -> Result<AiResponse, AiError> {
        let message = json
            .get("message")
            .filter(|m| m.is_object())
            .ok_or_else(|| AiError::ParseError("no 'message' field in response".to_string()))?;

        let content = message["content"].as_str().unwrap_or_default().to_string();

        let tool_calls = message["tool_calls"]
            .as_array()
            .map(|calls| {
                calls
                    .iter()
                    .map(|c| ToolCall {
                        name: c["function"]["name"].as_str().unwrap_or("").to_string(),
                        arguments: parse_arguments(&c["function"]["arguments"]),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(AiResponse {
            content,
            tool_calls,
        })
    }
}

/// Tool arguments arrive as a JSON object from Ollama, but some models
/// emit them as a JSON-encoded string instead. Accept both.
fn parse_arguments(raw: &serde_json::Value) -> serde_json::Value {
    match raw {
        serde_json::Value::String(text) => {
            serde_json::from_str(text).unwrap_or_else(|_| raw.clone())
        }
        other => other.clone(),
    }
}
