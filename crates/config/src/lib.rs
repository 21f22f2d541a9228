//! Configuration loading and validation for MarketScout.
//!
//! Loads `marketscout.toml`, applies environment variable overrides for
//! secrets, and validates all settings at startup. Every knob the
//! dispatch loop consumes lives in the `[dispatch]` table and is handed
//! to the loop at construction time; nothing is read from global state
//! after startup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Environment variable overriding the LLM API key.
pub const ENV_API_KEY: &str = "MARKETSCOUT_API_KEY";
/// Environment variable overriding the web search API key.
pub const ENV_SEARCH_API_KEY: &str = "MARKETSCOUT_SEARCH_API_KEY";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// The root configuration structure.
///
/// Maps directly to `marketscout.toml`.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// LLM provider settings (LLM-driven mode only).
    pub provider: ProviderConfig,

    /// Dispatch loop settings.
    pub dispatch: DispatchConfig,

    /// Tool selection and data source settings.
    pub tools: ToolsConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            dispatch: DispatchConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

/// Settings for the OpenAI-compatible provider.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of an OpenAI-compatible endpoint.
    pub base_url: String,

    /// Model name.
    pub model: String,

    /// API key. Prefer the `MARKETSCOUT_API_KEY` env var over the file.
    pub api_key: Option<String>,

    /// Sampling temperature.
    pub temperature: f32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            api_key: None,
            temperature: 0.0,
        }
    }
}

/// Knobs consumed by the dispatch loop at construction time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Maximum main-loop iterations per run.
    pub max_iterations: u32,

    /// Whether an empty web search triggers a retrieval fallback.
    pub use_fallback: bool,

    /// Minimum similarity score passed to the fallback retrieval query.
    pub fallback_min_score: f64,

    /// Maximum fallback tool calls per run, counted separately from the
    /// main iteration budget.
    pub max_fallback_attempts: u32,

    /// Per-tool-call timeout in seconds.
    pub tool_timeout_secs: u64,

    /// Fixed backoff before the single retry after a transient provider
    /// failure (LLM-driven mode only).
    pub retry_backoff_secs: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            use_fallback: true,
            fallback_min_score: 0.6,
            max_fallback_attempts: 2,
            tool_timeout_secs: 30,
            retry_backoff_secs: 25,
        }
    }
}

/// Which tool implementations to wire up.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// `fixture` for deterministic offline data, `live` for real APIs.
    pub mode: ToolMode,

    /// API key for the live web search backend.
    pub search_api_key: Option<String>,

    /// Endpoint of the live web search backend (Serper-style JSON API).
    pub search_endpoint: String,

    /// How many web results to request per query.
    pub search_num_results: usize,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            mode: ToolMode::Fixture,
            search_api_key: None,
            search_endpoint: "https://google.serper.dev/search".into(),
            search_num_results: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolMode {
    Fixture,
    Live,
}

fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &redact(&self.api_key))
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl std::fmt::Debug for ToolsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolsConfig")
            .field("mode", &self.mode)
            .field("search_api_key", &redact(&self.search_api_key))
            .field("search_endpoint", &self.search_endpoint)
            .field("search_num_results", &self.search_num_results)
            .finish()
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("dispatch", &self.dispatch)
            .field("tools", &self.tools)
            .finish()
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, then apply env overrides
    /// and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: AppConfig = toml::from_str(&raw)?;
        config.apply_env_overrides();
        config.validate()?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Load from the given path if it exists, otherwise fall back to
    /// defaults (still applying env overrides and validation).
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::load(path)
        } else {
            let mut config = AppConfig::default();
            config.apply_env_overrides();
            config.validate()?;
            Ok(config)
        }
    }

    /// Secrets from the environment win over the config file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(key) = std::env::var(ENV_API_KEY)
            && !key.is_empty()
        {
            self.provider.api_key = Some(key);
        }
        if let Ok(key) = std::env::var(ENV_SEARCH_API_KEY)
            && !key.is_empty()
        {
            self.tools.search_api_key = Some(key);
        }
    }

    /// Reject configurations the dispatch loop cannot honor.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dispatch.max_iterations == 0 {
            return Err(ConfigError::Invalid(
                "dispatch.max_iterations must be at least 1".into(),
            ));
        }
        if self.dispatch.tool_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "dispatch.tool_timeout_secs must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.dispatch.fallback_min_score) {
            return Err(ConfigError::Invalid(
                "dispatch.fallback_min_score must be within 0.0..=1.0".into(),
            ));
        }
        if self.tools.mode == ToolMode::Live && self.tools.search_api_key.is_none() {
            return Err(ConfigError::Invalid(format!(
                "tools.mode = \"live\" requires tools.search_api_key (or {ENV_SEARCH_API_KEY})"
            )));
        }
        Ok(())
    }
}
