//! Provider trait — the abstraction over LLM backends.
//!
//! Only the LLM-driven loop variant talks to a provider; the rule-based
//! loop never does. The protocol here is plain text: the model is asked
//! to emit `Thought` / `Action` / `Action Input` lines (or a
//! `Final Answer`), and the loop parses them back out of the response
//! content. No native tool-calling API is required.

use crate::error::ProviderError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// A completion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model to use (e.g. "gpt-4o-mini").
    pub model: String,

    /// The conversation messages.
    pub messages: Vec<Message>,

    /// Temperature (0.0 = deterministic).
    pub temperature: f32,

    /// Maximum tokens to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

/// A complete (non-streaming) response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    /// The generated text.
    pub content: String,

    /// Which model actually responded.
    pub model: String,

    /// Token usage, when the backend reports it.
    pub usage: Option<Usage>,
}

/// Token usage information.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// An LLM backend capable of chat completion.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short identifier for logs (e.g. "openai", "openrouter").
    fn name(&self) -> &str;

    /// Send a request and wait for the full response.
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError>;
}
