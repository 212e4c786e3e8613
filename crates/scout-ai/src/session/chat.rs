//! The tool-call loop: alternate model turns and tool executions until the
//! model produces a final answer or the round budget runs out.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::{AiClient, AiError, Message};

use super::manager::Session;
use super::types::{BusyGuard, ChatOutcome, ToolExecutor, ToolPayload};

const BUSY_MESSAGE: &str = "Session is busy with another request.";
const NO_ANSWER_MESSAGE: &str = "The model returned no answer.";
const EXHAUSTED_MESSAGE: &str = "Too many tool steps without a final answer.";

impl Session {
    /// Add a user message and drive the request to a terminal outcome.
    ///
    /// Every failure mode is folded into the returned [`ChatOutcome`];
    /// this method never errors. Tool calls within one model turn execute
    /// strictly sequentially, in emission order, and their results are
    /// appended to the conversation in that same order before the next
    /// model turn.
    pub async fn chat(
        &mut self,
        client: &dyn AiClient,
        executor: &dyn ToolExecutor,
        user_message: impl Into<String>,
    ) -> ChatOutcome {
        let _guard = match BusyGuard::acquire(&self.busy) {
            Some(guard) => guard,
            None => return ChatOutcome::failed(BUSY_MESSAGE),
        };

        self.messages.push(Message::user(user_message));

        let mut conversation = self.build_messages();
        let mut results: HashMap<String, ToolPayload> = HashMap::new();
        let mut rounds = 0u32;

        loop {
            if rounds >= self.max_tool_rounds {
                debug!(rounds, "model-turn budget exhausted");
                return ChatOutcome::exhausted(EXHAUSTED_MESSAGE, results);
            }
            rounds += 1;

            let response = match client.send_message(&conversation, &self.tools).await {
                Ok(response) => response,
                Err(err) => {
                    warn!(error = %err, "model call failed");
                    return ChatOutcome::failed(describe_model_error(&err));
                }
            };

            if response.tool_calls.is_empty() {
                if response.content.trim().is_empty() {
                    return ChatOutcome::failed(NO_ANSWER_MESSAGE);
                }
                // Final answer
                self.messages
                    .push(Message::assistant(response.content.clone(), Vec::new()));
                return ChatOutcome::answered(response.content, results);
            }

            // Append the assistant turn, tool calls included, before any
            // execution so the model sees a causally ordered history.
            conversation.push(Message::assistant(
                response.content.clone(),
                response.tool_calls.clone(),
            ));

            for call in &response.tool_calls {
                let outcome = executor.execute(&call.name, &call.arguments).await;
                debug!(tool = %outcome.tool, "executed tool");
                conversation.push(Message::tool(outcome.payload.as_message()));
                results.insert(outcome.tool, outcome.payload);
            }
        }
    }
}

/// Each model-side failure class maps to a distinct user-facing message, so
/// "could not reach the model" is distinguishable from "model responded
/// with garbage".
fn describe_model_error(err: &AiError) -> String {
    match err {
        AiError::Timeout => "Connection to the language model timed out.".to_string(),
        AiError::NetworkError(_) => format!("Could not reach the language model: {err}"),
        AiError::ApiError(_) => format!("The language model request failed: {err}"),
        AiError::ParseError(_) => {
            format!("The language model returned an unreadable response: {err}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::types::ToolOutcome;
    use crate::{AiResponse, Role, ToolCall, ToolDefinition};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Model double that replays a fixed script of responses and records
    /// the conversation it was shown on every call.
    struct ScriptedClient {
        script: Mutex<Vec<Result<AiResponse, AiError>>>,
        seen: Mutex<Vec<Vec<Message>>>,
    }

    impl ScriptedClient {
        fn new(script: Vec<Result<AiResponse, AiError>>) -> Self {
            Self {
                script: Mutex::new(script),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }

        fn conversation_at(&self, index: usize) -> Vec<Message> {
            self.seen.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl AiClient for ScriptedClient {
        async fn send_message(
            &self,
            messages: &[Message],
            _tools: &[ToolDefinition],
        ) -> Result<AiResponse, AiError> {
            self.seen.lock().unwrap().push(messages.to_vec());
            let mut script = self.script.lock().unwrap();
            assert!(!script.is_empty(), "model called more often than scripted");
            script.remove(0)
        }
    }

    /// Executor double with a fixed payload per tool name.
    struct MapExecutor {
        responses: Vec<(&'static str, ToolPayload)>,
        invocations: Mutex<Vec<String>>,
    }

    impl MapExecutor {
        fn new(responses: Vec<(&'static str, ToolPayload)>) -> Self {
            Self {
                responses,
                invocations: Mutex::new(Vec::new()),
            }
        }

        fn invocation_count(&self) -> usize {
            self.invocations.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ToolExecutor for MapExecutor {
        async fn execute(&self, name: &str, _arguments: &serde_json::Value) -> ToolOutcome {
            self.invocations.lock().unwrap().push(name.to_string());
            let payload = self
                .responses
                .iter()
                .find(|(tool, _)| *tool == name)
                .map(|(_, payload)| payload.clone())
                .unwrap_or(ToolPayload::UnknownTool);
            ToolOutcome::new(name, payload)
        }
    }

    /// Executor double that returns a strictly increasing sequence number,
    /// for pinning last-write-wins behavior.
    struct SequenceExecutor {
        counter: Mutex<u64>,
    }

    #[async_trait]
    impl ToolExecutor for SequenceExecutor {
        async fn execute(&self, name: &str, _arguments: &serde_json::Value) -> ToolOutcome {
            let mut counter = self.counter.lock().unwrap();
            *counter += 1;
            ToolOutcome::new(name, ToolPayload::Data(serde_json::json!({ "seq": *counter })))
        }
    }

    fn text(content: &str) -> Result<AiResponse, AiError> {
        Ok(AiResponse {
            content: content.to_string(),
            tool_calls: Vec::new(),
        })
    }

    fn tool_call(name: &str) -> Result<AiResponse, AiError> {
        Ok(AiResponse {
            content: String::new(),
            tool_calls: vec![ToolCall {
                name: name.to_string(),
                arguments: serde_json::json!({"player_name": "Lionel Messi"}),
            }],
        })
    }

    fn session() -> Session {
        Session::new()
            .with_system_prompt("You are a football assistant.")
            .with_tools(crate::tools::builtin_tools())
    }

    #[tokio::test]
    async fn direct_answer_without_tool_data_is_not_success() {
        let client = ScriptedClient::new(vec![text("Hello there")]);
        let executor = MapExecutor::new(vec![]);
        let mut session = session();

        let outcome = session.chat(&client, &executor, "hi").await;

        assert!(!outcome.success, "no accumulated data means success=false");
        assert_eq!(outcome.message, "Hello there");
        assert!(outcome.results.is_empty());
        // user + final assistant turn recorded
        assert_eq!(session.message_count(), 2);
    }

    #[tokio::test]
    async fn tool_round_then_final_answer() {
        let client = ScriptedClient::new(vec![
            tool_call("search_sportsdb"),
            text("Messi plays for Inter Miami."),
        ]);
        let executor = MapExecutor::new(vec![(
            "search_sportsdb",
            ToolPayload::Data(serde_json::json!({"strPlayer": "Lionel Messi"})),
        )]);
        let mut session = session();

        let outcome = session.chat(&client, &executor, "tell me about Messi").await;

        assert!(outcome.success);
        assert_eq!(outcome.message, "Messi plays for Inter Miami.");
        assert_eq!(
            outcome.results["search_sportsdb"]
                .data()
                .unwrap()["strPlayer"],
            "Lionel Messi"
        );

        // The second model call must see system, user, assistant (with the
        // tool call), then the tool result, in that order.
        let second = client.conversation_at(1);
        let roles: Vec<Role> = second.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant, Role::Tool]);
        assert_eq!(second[2].tool_calls.len(), 1);
        assert!(second[3].content.contains("strPlayer"));
    }

    #[tokio::test]
    async fn unreachable_model_aborts_before_any_tool() {
        let client = ScriptedClient::new(vec![Err(AiError::NetworkError(
            "connection refused".into(),
        ))]);
        let executor = MapExecutor::new(vec![]);
        let mut session = session();

        let outcome = session.chat(&client, &executor, "tell me about Messi").await;

        assert!(!outcome.success);
        assert!(outcome.message.contains("Could not reach"));
        assert_eq!(executor.invocation_count(), 0);
    }

    #[tokio::test]
    async fn model_timeout_has_timeout_message() {
        let client = ScriptedClient::new(vec![Err(AiError::Timeout)]);
        let executor = MapExecutor::new(vec![]);
        let mut session = session();

        let outcome = session.chat(&client, &executor, "hi").await;

        assert!(!outcome.success);
        assert!(outcome.message.contains("timed out"));
    }

    #[tokio::test]
    async fn budget_exhaustion_returns_fixed_message() {
        // Model never stops asking for the same tool.
        let client = ScriptedClient::new(vec![
            tool_call("search_sportsdb"),
            tool_call("search_sportsdb"),
            tool_call("search_sportsdb"),
            tool_call("search_sportsdb"),
            tool_call("search_sportsdb"),
        ]);
        let executor = MapExecutor::new(vec![(
            "search_sportsdb",
            ToolPayload::Data(serde_json::json!({"strPlayer": "Lionel Messi"})),
        )]);
        let mut session = session();

        let outcome = session.chat(&client, &executor, "tell me about Messi").await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, EXHAUSTED_MESSAGE);
        assert_eq!(client.calls(), 5, "budget is five model turns");
        // Results gathered before exhaustion are kept.
        assert!(outcome.results.contains_key("search_sportsdb"));
    }

    #[tokio::test]
    async fn duplicate_tool_results_last_write_wins() {
        // One model turn requesting the same tool twice; current behavior
        // keeps the later result.
        let client = ScriptedClient::new(vec![
            Ok(AiResponse {
                content: String::new(),
                tool_calls: vec![
                    ToolCall {
                        name: "search_sportsdb".into(),
                        arguments: serde_json::json!({"player_name": "Messi"}),
                    },
                    ToolCall {
                        name: "search_sportsdb".into(),
                        arguments: serde_json::json!({"player_name": "Lionel Messi"}),
                    },
                ],
            }),
            text("done"),
        ]);
        let executor = SequenceExecutor {
            counter: Mutex::new(0),
        };
        let mut session = session();

        let outcome = session.chat(&client, &executor, "stats please").await;

        assert_eq!(outcome.results.len(), 1);
        assert_eq!(outcome.results["search_sportsdb"].data().unwrap()["seq"], 2);

        // Both results were still appended to the conversation, in order.
        let second = client.conversation_at(1);
        let tool_turns: Vec<&Message> =
            second.iter().filter(|m| m.role == Role::Tool).collect();
        assert_eq!(tool_turns.len(), 2);
        assert!(tool_turns[0].content.contains("1"));
        assert!(tool_turns[1].content.contains("2"));
    }

    #[tokio::test]
    async fn tool_failure_degrades_without_aborting() {
        let client = ScriptedClient::new(vec![
            Ok(AiResponse {
                content: String::new(),
                tool_calls: vec![
                    ToolCall {
                        name: "search_sportsdb".into(),
                        arguments: serde_json::json!({"player_name": "Xavi"}),
                    },
                    ToolCall {
                        name: "search_wikipedia".into(),
                        arguments: serde_json::json!({"player_name": "Xavi"}),
                    },
                ],
            }),
            text("Here is what I found about Xavi."),
        ]);
        let executor = MapExecutor::new(vec![
            ("search_sportsdb", ToolPayload::Failed("connect error".into())),
            (
                "search_wikipedia",
                ToolPayload::Data(serde_json::json!({"title": "Xavi"})),
            ),
        ]);
        let mut session = session();

        let outcome = session.chat(&client, &executor, "who is Xavi?").await;

        assert!(outcome.success);
        assert!(outcome.results["search_sportsdb"].data().is_none());
        assert_eq!(
            outcome.results["search_wikipedia"].data().unwrap()["title"],
            "Xavi"
        );
    }

    #[tokio::test]
    async fn unknown_tool_is_absorbed() {
        let client = ScriptedClient::new(vec![tool_call("search_transfermarkt"), text("ok")]);
        let executor = MapExecutor::new(vec![]);
        let mut session = session();

        let outcome = session.chat(&client, &executor, "hi").await;

        assert_eq!(
            outcome.results["search_transfermarkt"],
            ToolPayload::UnknownTool
        );
        // The loop carried on to the final answer.
        assert_eq!(outcome.message, "ok");
    }

    #[tokio::test]
    async fn empty_model_response_is_failure() {
        let client = ScriptedClient::new(vec![text("   ")]);
        let executor = MapExecutor::new(vec![]);
        let mut session = session();

        let outcome = session.chat(&client, &executor, "hi").await;

        assert!(!outcome.success);
        assert_eq!(outcome.message, NO_ANSWER_MESSAGE);
    }
}
