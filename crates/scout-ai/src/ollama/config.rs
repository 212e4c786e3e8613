//! Ollama client configuration.

use std::fmt;
use std::time::Duration;

use scout_common::ConfigError;

/// Ollama client configuration.
///
/// All knobs have sensible local defaults; `from_env` overrides them from
/// `SCOUT_OLLAMA_*` variables so deployments never patch constants.
#[derive(Clone)]
pub struct OllamaConfig {
    pub base_url: String,
    pub model: String,
    /// Bearer token for proxied deployments. Plain local Ollama needs none.
    pub api_key: Option<String>,
    pub temperature: f64,
    /// Upper bound on generated tokens per model turn.
    pub num_predict: u32,
    pub system_prompt: Option<String>,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl fmt::Debug for OllamaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OllamaConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("temperature", &self.temperature)
            .field("num_predict", &self.num_predict)
            .field("system_prompt", &self.system_prompt)
            .field("connect_timeout", &self.connect_timeout)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434".to_string(),
            model: "llama3.1:8b".to_string(),
            api_key: None,
            temperature: 0.7,
            num_predict: 500,
            system_prompt: None,
            connect_timeout: Duration::from_secs(10),
            timeout: Duration::from_secs(120),
        }
    }
}

impl OllamaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from `SCOUT_OLLAMA_*` environment variables.
    ///
    /// Unset variables keep their defaults; set-but-malformed numeric
    /// values are an error rather than a silent fallback.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("SCOUT_OLLAMA_URL") {
            config.base_url = url;
        }
        if let Ok(model) = std::env::var("SCOUT_OLLAMA_MODEL") {
            config.model = model;
        }
        if let Ok(key) = std::env::var("SCOUT_OLLAMA_API_KEY") {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        if let Ok(value) = std::env::var("SCOUT_OLLAMA_TEMPERATURE") {
            config.temperature = value
                .parse()
                .map_err(|_| ConfigError::invalid("SCOUT_OLLAMA_TEMPERATURE", &value))?;
        }
        if let Ok(value) = std::env::var("SCOUT_OLLAMA_NUM_PREDICT") {
            config.num_predict = value
                .parse()
                .map_err(|_| ConfigError::invalid("SCOUT_OLLAMA_NUM_PREDICT", &value))?;
        }
        if let Ok(value) = std::env::var("SCOUT_OLLAMA_TIMEOUT_SECS") {
            let secs: u64 = value
                .parse()
                .map_err(|_| ConfigError::invalid("SCOUT_OLLAMA_TIMEOUT_SECS", &value))?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
