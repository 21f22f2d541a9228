//! LLM provider implementations for MarketScout.
//!
//! Only the LLM-driven loop variant needs a provider; the rule-based
//! loop runs fully offline. The one implementation here speaks the
//! OpenAI-compatible chat completions protocol, which covers OpenAI,
//! OpenRouter, Ollama, vLLM, and most hosted endpoints.

pub mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;

use marketscout_config::ProviderConfig;
use marketscout_core::error::ProviderError;
use marketscout_core::provider::Provider;
use std::sync::Arc;

/// Build a provider from configuration.
///
/// Fails fast when no API key is available rather than letting the
/// first completion call surface an authentication error mid-run.
pub fn from_config(config: &ProviderConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        ProviderError::NotConfigured(
            "no API key set; use provider.api_key or MARKETSCOUT_API_KEY".into(),
        )
    })?;
    Ok(Arc::new(OpenAiCompatProvider::new(
        "openai_compat",
        &config.base_url,
        api_key,
    )))
}
