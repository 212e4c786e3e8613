//! TheSportsDB client for player lookups.

use std::fmt;
use std::time::Duration;

use scout_common::ConfigError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::DataError;

/// TheSportsDB client configuration.
#[derive(Clone)]
pub struct SportsDbConfig {
    pub base_url: String,
    /// API key, used as a path segment. `"3"` is the public free tier.
    pub api_key: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl fmt::Debug for SportsDbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SportsDbConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for SportsDbConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.thesportsdb.com".to_string(),
            api_key: "3".to_string(),
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(15),
        }
    }
}

impl SportsDbConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from `SCOUT_SPORTSDB_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("SCOUT_SPORTSDB_URL") {
            config.base_url = url;
        }
        if let Ok(key) = std::env::var("SCOUT_SPORTSDB_KEY") {
            if !key.is_empty() {
                config.api_key = key;
            }
        }
        if let Ok(value) = std::env::var("SCOUT_SPORTSDB_TIMEOUT_SECS") {
            let secs: u64 = value
                .parse()
                .map_err(|_| ConfigError::invalid("SCOUT_SPORTSDB_TIMEOUT_SECS", &value))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// One player record as returned by the `searchplayers` endpoint.
///
/// The fields the rest of the system reads are typed; everything else the
/// upstream sends (height, weight, biography, thumbnails, ...) is kept in
/// `extra` so the full record survives serialization back to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRecord {
    #[serde(rename = "strPlayer")]
    pub name: Option<String>,
    #[serde(rename = "strTeam")]
    pub team: Option<String>,
    #[serde(rename = "strNationality")]
    pub nationality: Option<String>,
    #[serde(rename = "strPosition")]
    pub position: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Wire shape of the search endpoint; `player` is `null` when nothing
/// matched.
#[derive(Debug, Deserialize)]
struct SearchPlayersResponse {
    player: Option<Vec<PlayerRecord>>,
}

impl SearchPlayersResponse {
    fn into_first(self) -> Option<PlayerRecord> {
        self.player.and_then(|mut players| {
            if players.is_empty() {
                None
            } else {
                Some(players.remove(0))
            }
        })
    }
}

/// TheSportsDB HTTP client.
pub struct SportsDbClient {
    config: SportsDbConfig,
    http: reqwest::Client,
}

impl SportsDbClient {
    pub fn new(config: SportsDbConfig) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .expect("failed to build HTTP client");
        Self { config, http }
    }

    /// Search for a player by name, returning the first match or `None`.
    pub async fn search_player(&self, name: &str) -> Result<Option<PlayerRecord>, DataError> {
        let url = format!(
            "{}/api/v1/json/{}/searchplayers.php",
            self.config.base_url.trim_end_matches('/'),
            self.config.api_key,
        );

        debug!(player = name, "TheSportsDB search");

        let response = self.http.get(url).query(&[("p", name)]).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Status(status));
        }

        let body: SearchPlayersResponse = response.json().await?;
        Ok(body.into_first())
    }
}
