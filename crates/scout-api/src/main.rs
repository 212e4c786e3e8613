//! scout-api: HTTP backend answering free-text questions about football
//! players, either by driving a local model through the tool-call loop or
//! by querying both data sources directly.

mod cli;
mod extract;
mod prompts;
mod routes;
mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use scout_ai::{tools, OllamaClient, OllamaConfig};
use scout_common::ConfigError;
use scout_data::{
    DataRouter, SportsDbClient, SportsDbConfig, WikipediaClient, WikipediaConfig,
};

/// Load environment variables from a .env file (KEY=VALUE lines).
fn load_dotenv() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [
        // Workspace root, two levels up from crates/scout-api/
        manifest_dir.join("..").join("..").join(".env"),
        // Current directory
        std::path::PathBuf::from(".env"),
    ];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for line in contents.lines() {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((key, value)) = line.split_once('=') {
                    let key = key.trim();
                    let value = value.trim().trim_matches('"').trim_matches('\'');
                    if std::env::var(key).is_err() {
                        std::env::set_var(key, value);
                    }
                }
            }
            return;
        }
    }
}

#[tokio::main]
async fn main() -> scout_common::Result<()> {
    // Load .env before anything reads the environment
    load_dotenv();

    let args = cli::parse();

    // Initialize logging
    let log_directive = args.log_level.as_deref().unwrap_or("info");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(
                log_directive
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap()),
            ),
        )
        .init();

    tracing::info!("scout-api v{} starting", env!("CARGO_PKG_VERSION"));

    let ollama_config = OllamaConfig::from_env()?;
    tracing::info!(config = ?ollama_config, "model client configured");

    let client = Arc::new(OllamaClient::new(ollama_config));
    let executor = Arc::new(DataRouter::new(
        SportsDbClient::new(SportsDbConfig::from_env()?),
        WikipediaClient::new(WikipediaConfig::from_env()?),
    ));

    let state = Arc::new(server::AppState {
        client,
        executor,
        tools: tools::builtin_tools(),
        system_prompt: prompts::SYSTEM_PROMPT.to_string(),
        max_tool_rounds: args.max_tool_rounds,
    });

    let addr: SocketAddr = args
        .bind
        .parse()
        .map_err(|_| ConfigError::invalid("--bind", &args.bind))?;

    server::serve(addr, state).await
}
