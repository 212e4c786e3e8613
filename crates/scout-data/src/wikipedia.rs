//! Wikipedia client: two-step lookup of a player's introductory summary.
//!
//! Step one searches for "<name> footballer" to resolve a page title;
//! step two fetches that page's intro extract and lead image.

use std::fmt;
use std::time::Duration;

use scout_common::ConfigError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::DataError;

/// Wikipedia client configuration.
#[derive(Clone)]
pub struct WikipediaConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl fmt::Debug for WikipediaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WikipediaConfig")
            .field("base_url", &self.base_url)
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://en.wikipedia.org".to_string(),
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(15),
        }
    }
}

impl WikipediaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from `SCOUT_WIKI_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("SCOUT_WIKI_URL") {
            config.base_url = url;
        }
        if let Ok(value) = std::env::var("SCOUT_WIKI_TIMEOUT_SECS") {
            let secs: u64 = value
                .parse()
                .map_err(|_| ConfigError::invalid("SCOUT_WIKI_TIMEOUT_SECS", &value))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

/// A page's introductory summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WikiSummary {
    pub title: Option<String>,
    pub extract: Option<String>,
    pub image: Option<String>,
}

/// Wikipedia HTTP client.
pub struct WikipediaClient {
    config: WikipediaConfig,
    http: reqwest::Client,
}

impl WikipediaClient {
    pub fn new(config: WikipediaConfig) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.timeout)
            .build()
            .expect("failed to build HTTP client");
        Self { config, http }
    }

    fn api_url(&self) -> String {
        format!("{}/w/api.php", self.config.base_url.trim_end_matches('/'))
    }

    /// Look up the intro summary for a player, or `None` when no page
    /// matches.
    pub async fn summary(&self, name: &str) -> Result<Option<WikiSummary>, DataError> {
        let Some(title) = self.search_title(name).await? else {
            return Ok(None);
        };
        self.fetch_summary(&title).await
    }

    /// Resolve a page title via full-text search with a "footballer"
    /// qualifier, taking the top hit.
    async fn search_title(&self, name: &str) -> Result<Option<String>, DataError> {
        debug!(player = name, "Wikipedia title search");

        let terms = format!("{name} footballer");
        let response = self
            .http
            .get(self.api_url())
            .query(&[
                ("action", "query"),
                ("list", "search"),
                ("srsearch", terms.as_str()),
                ("srlimit", "1"),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Status(status));
        }

        let json: serde_json::Value = response.json().await?;
        Ok(title_from_search(&json))
    }

    async fn fetch_summary(&self, title: &str) -> Result<Option<WikiSummary>, DataError> {
        debug!(title, "Wikipedia extract fetch");

        let response = self
            .http
            .get(self.api_url())
            .query(&[
                ("action", "query"),
                ("prop", "extracts|pageimages"),
                ("exintro", "true"),
                ("explaintext", "true"),
                ("piprop", "original"),
                ("titles", title),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Status(status));
        }

        let json: serde_json::Value = response.json().await?;
        Ok(summary_from_pages(&json))
    }
}

fn title_from_search(json: &serde_json::Value) -> Option<String> {
    json["query"]["search"][0]["title"]
        .as_str()
        .map(String::from)
}

/// The extract endpoint keys its result by page id; take the first page,
/// as there is only ever one for a single-title query.
fn summary_from_pages(json: &serde_json::Value) -> Option<WikiSummary> {
    let pages = json["query"]["pages"].as_object()?;
    let page = pages.values().next()?;

    Some(WikiSummary {
        title: page["title"].as_str().map(String::from),
        extract: page["extract"].as_str().map(String::from),
        image: page["original"]["source"].as_str().map(String::from),
    })
}
