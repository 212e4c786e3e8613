//! Session types, the tool-execution seam, and concurrency guards.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

/// Executes a tool call against its external data source.
///
/// Implementations must fold every failure into a [`ToolPayload`]: absence
/// of data is a normal outcome for the loop, never an error.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    async fn execute(&self, name: &str, arguments: &serde_json::Value) -> ToolOutcome;
}

/// Result of one tool invocation.
#[derive(Debug, Clone)]
pub struct ToolOutcome {
    pub tool: String,
    pub payload: ToolPayload,
}

impl ToolOutcome {
    pub fn new(tool: impl Into<String>, payload: ToolPayload) -> Self {
        Self {
            tool: tool.into(),
            payload,
        }
    }
}

/// Tagged result payload for a single tool call.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolPayload {
    /// The source returned a record.
    Data(serde_json::Value),
    /// The source was reached but had no matching record.
    NotFound,
    /// The model asked for a tool that is not in the registry.
    UnknownTool,
    /// The call could not be completed (transport, decode, bad arguments).
    Failed(String),
}

impl ToolPayload {
    /// Serialized form appended to the conversation as the tool turn.
    pub fn as_message(&self) -> String {
        match self {
            ToolPayload::Data(value) => value.to_string(),
            ToolPayload::NotFound => r#"{"error":"not found"}"#.to_string(),
            ToolPayload::UnknownTool => r#"{"error":"unknown tool"}"#.to_string(),
            ToolPayload::Failed(reason) => {
                serde_json::json!({ "error": reason }).to_string()
            }
        }
    }

    /// The fetched record, if this payload carries one.
    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            ToolPayload::Data(value) => Some(value),
            _ => None,
        }
    }
}

/// Terminal output of the orchestration loop.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub success: bool,
    pub message: String,
    /// Latest payload per tool name for this request. A second invocation
    /// of the same tool overwrites the first.
    pub results: HashMap<String, ToolPayload>,
}

impl ChatOutcome {
    /// Final model answer; success tracks whether any tool result was
    /// accumulated along the way.
    pub(crate) fn answered(message: String, results: HashMap<String, ToolPayload>) -> Self {
        Self {
            success: !results.is_empty(),
            message,
            results,
        }
    }

    pub(crate) fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            results: HashMap::new(),
        }
    }

    pub(crate) fn exhausted(
        message: impl Into<String>,
        results: HashMap<String, ToolPayload>,
    ) -> Self {
        Self {
            success: false,
            message: message.into(),
            results,
        }
    }
}

/// Guard that clears the `busy` flag on drop, ensuring it is always released
/// even if the future is cancelled or an early return occurs.
pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> BusyGuard<'a> {
    /// Attempt to acquire the busy lock. Returns `None` if already busy.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            return None;
        }
        Some(Self { flag })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_messages_are_json() {
        let data = ToolPayload::Data(serde_json::json!({"strPlayer": "Xavi"}));
        assert_eq!(data.as_message(), r#"{"strPlayer":"Xavi"}"#);

        for payload in [
            ToolPayload::NotFound,
            ToolPayload::UnknownTool,
            ToolPayload::Failed("connect error".into()),
        ] {
            let parsed: serde_json::Value =
                serde_json::from_str(&payload.as_message()).unwrap();
            assert!(parsed["error"].is_string());
            assert!(payload.data().is_none());
        }
    }

    #[test]
    fn busy_guard_released_on_drop() {
        let flag = AtomicBool::new(false);
        {
            let _guard = BusyGuard::acquire(&flag).unwrap();
            assert!(BusyGuard::acquire(&flag).is_none());
        }
        assert!(BusyGuard::acquire(&flag).is_some());
    }
}
