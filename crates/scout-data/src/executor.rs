//! Tool executor: routes the model's tool calls to the data clients.
//!
//! Every failure is folded into a tagged payload. The orchestration loop
//! treats absence of data as a normal outcome, so nothing here returns an
//! error.

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;

use scout_ai::{ToolExecutor, ToolOutcome, ToolPayload};

use crate::sportsdb::SportsDbClient;
use crate::wikipedia::WikipediaClient;
use crate::DataError;

/// Dispatches tool invocations to the bound external collaborators.
pub struct DataRouter {
    sportsdb: SportsDbClient,
    wikipedia: WikipediaClient,
}

impl DataRouter {
    pub fn new(sportsdb: SportsDbClient, wikipedia: WikipediaClient) -> Self {
        Self { sportsdb, wikipedia }
    }
}

#[async_trait]
impl ToolExecutor for DataRouter {
    async fn execute(&self, name: &str, arguments: &serde_json::Value) -> ToolOutcome {
        let payload = match name {
            "search_sportsdb" => match player_name(arguments) {
                Some(player) => as_payload(self.sportsdb.search_player(&player).await),
                None => missing_player_name(),
            },
            "search_wikipedia" => match player_name(arguments) {
                Some(player) => as_payload(self.wikipedia.summary(&player).await),
                None => missing_player_name(),
            },
            _ => {
                warn!(tool = name, "model requested unknown tool");
                ToolPayload::UnknownTool
            }
        };

        ToolOutcome::new(name, payload)
    }
}

/// Tool arguments are passed through unvalidated; a missing or non-string
/// `player_name` becomes a failed call rather than a panic.
fn player_name(arguments: &serde_json::Value) -> Option<String> {
    arguments["player_name"]
        .as_str()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
}

fn missing_player_name() -> ToolPayload {
    ToolPayload::Failed("missing player_name argument".to_string())
}

fn as_payload<T: Serialize>(result: Result<Option<T>, DataError>) -> ToolPayload {
    match result {
        Ok(Some(record)) => match serde_json::to_value(&record) {
            Ok(value) => ToolPayload::Data(value),
            Err(err) => ToolPayload::Failed(err.to_string()),
        },
        Ok(None) => ToolPayload::NotFound,
        Err(err) => {
            warn!(error = %err, "tool call failed");
            ToolPayload::Failed(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sportsdb::SportsDbConfig;
    use crate::wikipedia::WikipediaConfig;

    fn router() -> DataRouter {
        DataRouter::new(
            SportsDbClient::new(SportsDbConfig::new()),
            WikipediaClient::new(WikipediaConfig::new()),
        )
    }

    #[tokio::test]
    async fn unknown_tool_is_tagged() {
        let outcome = router()
            .execute("search_transfermarkt", &serde_json::json!({}))
            .await;
        assert_eq!(outcome.tool, "search_transfermarkt");
        assert_eq!(outcome.payload, ToolPayload::UnknownTool);
    }

    #[tokio::test]
    async fn missing_argument_is_failed_not_panic() {
        for arguments in [
            serde_json::json!({}),
            serde_json::json!({"player_name": 42}),
            serde_json::json!({"player_name": "   "}),
        ] {
            let outcome = router().execute("search_sportsdb", &arguments).await;
            assert!(matches!(outcome.payload, ToolPayload::Failed(_)));
        }
    }

    #[test]
    fn data_error_becomes_failed_payload() {
        let result: Result<Option<serde_json::Value>, DataError> =
            Err(DataError::Network("connect error".into()));
        assert!(matches!(as_payload(result), ToolPayload::Failed(_)));
    }

    #[test]
    fn empty_result_becomes_not_found() {
        let result: Result<Option<serde_json::Value>, DataError> = Ok(None);
        assert_eq!(as_payload(result), ToolPayload::NotFound);
    }

    #[test]
    fn record_becomes_data_payload() {
        let result: Result<Option<serde_json::Value>, DataError> =
            Ok(Some(serde_json::json!({"strPlayer": "Xavi"})));
        let payload = as_payload(result);
        assert_eq!(payload.data().unwrap()["strPlayer"], "Xavi");
    }
}
