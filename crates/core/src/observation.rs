//! Observation and payload types — what comes back from a tool call.
//!
//! Every tool invocation yields exactly one [`Observation`]: either a
//! success carrying a [`Payload`], or a structured error. The dispatch
//! loop records observations index-aligned with the tool calls that
//! produced them, so the trace can always be replayed decision by
//! decision.

use crate::error::ToolError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Category records ──────────────────────────────────────────────────────

/// A competitor surfaced by the competitor finder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitorRecord {
    pub name: String,
    pub industry: String,
    pub description: String,
    /// Keyword-overlap similarity against the parsed input, in `0.0..=1.0`.
    pub similarity: f64,
}

/// One funding round for a company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRound {
    pub round: String,
    pub amount_usd: u64,
    /// ISO date string as it appears in the source dataset.
    pub date: String,
}

/// Funding rounds keyed by company name. BTreeMap keeps report output
/// in a stable order.
pub type FundingMap = BTreeMap<String, Vec<FundingRound>>;

/// One web or news search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// One semantic-retrieval hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalHit {
    pub content: String,
    pub source: String,
    pub score: f64,
}

// ── Payload ───────────────────────────────────────────────────────────────

/// The success payload of a tool call, shaped per category.
///
/// `Empty` is what the `no_op` sentinel returns; a categorized payload
/// with no items (e.g. a search that matched nothing) is *also* treated
/// as empty by [`Payload::is_empty`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum Payload {
    Competitors(Vec<CompetitorRecord>),
    Funding(FundingMap),
    WebResults(Vec<WebResult>),
    RetrievalHits(Vec<RetrievalHit>),
    Empty,
}

impl Payload {
    /// Which collected-data category this payload feeds, if any.
    pub fn category(&self) -> Option<Category> {
        match self {
            Payload::Competitors(_) => Some(Category::Competitors),
            Payload::Funding(_) => Some(Category::Funding),
            Payload::WebResults(_) => Some(Category::WebResults),
            Payload::RetrievalHits(_) => Some(Category::RetrievalResults),
            Payload::Empty => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Payload::Competitors(v) => v.is_empty(),
            Payload::Funding(m) => m.is_empty(),
            Payload::WebResults(v) => v.is_empty(),
            Payload::RetrievalHits(v) => v.is_empty(),
            Payload::Empty => true,
        }
    }

    /// One-line description for trace rendering.
    pub fn summary(&self) -> String {
        match self {
            Payload::Competitors(v) => format!("{} competitor(s)", v.len()),
            Payload::Funding(m) => format!("funding data for {} company(ies)", m.len()),
            Payload::WebResults(v) => format!("{} web result(s)", v.len()),
            Payload::RetrievalHits(v) => format!("{} retrieval hit(s)", v.len()),
            Payload::Empty => "empty".into(),
        }
    }
}

/// The four collected-data buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Competitors,
    Funding,
    WebResults,
    RetrievalResults,
}

// ── Observation ───────────────────────────────────────────────────────────

/// The recorded result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Observation {
    Success { payload: Payload },
    Error { kind: ObservationErrorKind, message: String },
}

/// Classification of a recorded fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObservationErrorKind {
    ToolNotFound,
    ExecutionFailed,
    Timeout,
    InvalidArguments,
    Provider,
}

impl Observation {
    pub fn success(payload: Payload) -> Self {
        Observation::Success { payload }
    }

    /// The empty-success observation the `no_op` sentinel produces.
    pub fn empty() -> Self {
        Observation::Success {
            payload: Payload::Empty,
        }
    }

    pub fn provider_error(message: impl Into<String>) -> Self {
        Observation::Error {
            kind: ObservationErrorKind::Provider,
            message: message.into(),
        }
    }

    /// Convert a tool-boundary fault into a recorded observation.
    pub fn from_tool_error(err: &ToolError) -> Self {
        let kind = match err {
            ToolError::NotFound(_) => ObservationErrorKind::ToolNotFound,
            ToolError::ExecutionFailed { .. } => ObservationErrorKind::ExecutionFailed,
            ToolError::Timeout { .. } => ObservationErrorKind::Timeout,
            ToolError::InvalidArguments(_) => ObservationErrorKind::InvalidArguments,
        };
        Observation::Error {
            kind,
            message: err.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Observation::Error { .. })
    }

    /// A success that carried nothing: the trigger condition for the
    /// fallback path.
    pub fn is_empty_success(&self) -> bool {
        matches!(self, Observation::Success { payload } if payload.is_empty())
    }

    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Observation::Success { payload } => Some(payload),
            Observation::Error { .. } => None,
        }
    }

    /// One-line description for trace rendering and model scratchpads.
    pub fn summary(&self) -> String {
        match self {
            Observation::Success { payload } => payload.summary(),
            Observation::Error { message, .. } => format!("error: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_detection() {
        assert!(Payload::Empty.is_empty());
        assert!(Payload::Competitors(vec![]).is_empty());
        assert!(Payload::Funding(FundingMap::new()).is_empty());
        assert!(
            !Payload::WebResults(vec![WebResult {
                title: "t".into(),
                url: "u".into(),
                snippet: "s".into(),
            }])
            .is_empty()
        );
    }

    #[test]
    fn categories() {
        assert_eq!(
            Payload::Competitors(vec![]).category(),
            Some(Category::Competitors)
        );
        assert_eq!(Payload::Empty.category(), None);
    }

    #[test]
    fn tool_error_mapping() {
        let obs = Observation::from_tool_error(&ToolError::NotFound("bogus".into()));
        assert!(obs.is_error());
        assert!(matches!(
            obs,
            Observation::Error {
                kind: ObservationErrorKind::ToolNotFound,
                ..
            }
        ));

        let obs = Observation::from_tool_error(&ToolError::Timeout {
            tool_name: "web_search".into(),
            timeout_secs: 30,
        });
        assert!(matches!(
            obs,
            Observation::Error {
                kind: ObservationErrorKind::Timeout,
                ..
            }
        ));
    }

    #[test]
    fn empty_success_triggers_fallback_check() {
        assert!(Observation::empty().is_empty_success());
        assert!(Observation::success(Payload::WebResults(vec![])).is_empty_success());
        assert!(!Observation::provider_error("boom").is_empty_success());
    }

    #[test]
    fn serialization_roundtrip() {
        let obs = Observation::success(Payload::Competitors(vec![CompetitorRecord {
            name: "PayTrail".into(),
            industry: "fintech".into(),
            description: "SMB payments".into(),
            similarity: 0.8,
        }]));
        let json = serde_json::to_string(&obs).unwrap();
        let back: Observation = serde_json::from_str(&json).unwrap();
        assert_eq!(obs, back);
    }
}
