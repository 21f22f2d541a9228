//! Parsed input — the structured form of a free-text startup idea.
//!
//! Produced once per run by an input parser (heuristic or LLM-backed)
//! and read-only for the rest of the run. All fields default to empty
//! rather than being optional: downstream code never has to null-check.

use serde::{Deserialize, Serialize};

/// Structured representation of a business idea.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsedInput {
    /// One-line statement of the idea itself.
    pub core_idea: String,

    /// Business domain (e.g. "fintech", "health").
    pub domain: String,

    /// Key product features, in the order they were mentioned.
    pub key_features: Vec<String>,

    /// Who the product is for (e.g. "SMB", "college students").
    pub target_audience: String,
}

impl ParsedInput {
    /// The domain, or a neutral placeholder when the parser found none.
    pub fn domain_or_default(&self) -> &str {
        if self.domain.is_empty() {
            "startup"
        } else {
            &self.domain
        }
    }
}
