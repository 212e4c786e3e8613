//! Session struct and conversation management.

use std::sync::atomic::AtomicBool;

use crate::{Message, Role, ToolDefinition};

/// A single-request conversation with message history and a bounded
/// tool-call budget. The session exclusively owns its conversation; other
/// components only ever see it as a borrowed slice per model turn.
pub struct Session {
    /// Conversation message history.
    pub(super) messages: Vec<Message>,
    /// System prompt (always the first turn of every model call).
    pub(super) system_prompt: Option<String>,
    /// Available tool definitions.
    pub(super) tools: Vec<ToolDefinition>,
    /// Maximum model turns per request, to prevent infinite loops.
    pub(super) max_tool_rounds: u32,
    /// Whether the session is currently processing a request.
    pub(super) busy: AtomicBool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            system_prompt: None,
            tools: Vec::new(),
            max_tool_rounds: 5,
            busy: AtomicBool::new(false),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_max_tool_rounds(mut self, max: u32) -> Self {
        self.max_tool_rounds = max;
        self
    }

    /// Conversation as sent to the model: the single system turn first,
    /// then the accumulated history.
    pub(super) fn build_messages(&self) -> Vec<Message> {
        let mut msgs = Vec::new();
        if let Some(ref system) = self.system_prompt {
            msgs.push(Message {
                role: Role::System,
                content: system.clone(),
                tool_calls: Vec::new(),
            });
        }
        msgs.extend(self.messages.iter().cloned());
        msgs
    }

    /// Get the conversation history (excluding the system turn).
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages in history.
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
