//! Semantic retrieval — similarity search over an injected corpus.
//!
//! Stands in for a vector store: each document carries a topic and a
//! base relevance score, and queries are matched by keyword overlap
//! with the topic. Deterministic by construction, which the fallback
//! path's tests rely on.

use async_trait::async_trait;
use marketscout_core::error::ToolError;
use marketscout_core::observation::{Payload, RetrievalHit};
use marketscout_core::tool::Tool;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusDocument {
    pub topic: String,
    pub content: String,
    pub source: String,
    pub relevance: f64,
}

pub struct RagQueryTool {
    corpus: Vec<CorpusDocument>,
}

impl RagQueryTool {
    pub fn new(corpus: Vec<CorpusDocument>) -> Self {
        Self { corpus }
    }

    pub fn fixture() -> Self {
        let doc = |topic: &str, content: &str, source: &str, relevance: f64| CorpusDocument {
            topic: topic.into(),
            content: content.into(),
            source: source.into(),
            relevance,
        };
        Self::new(vec![
            doc(
                "fintech",
                "Successful fintech startups pair a narrow payments wedge with strong compliance automation; unit economics improve sharply once processing volume crosses the SMB threshold.",
                "market-playbooks/fintech.md",
                0.9,
            ),
            doc(
                "fintech",
                "Churn in SMB financial tooling correlates with onboarding time; the winning products import ledger history in under an hour.",
                "market-playbooks/fintech-onboarding.md",
                0.75,
            ),
            doc(
                "health",
                "Consumer health apps retain users through habit loops tied to clinician or coach feedback rather than raw tracking.",
                "market-playbooks/health.md",
                0.85,
            ),
            doc(
                "e-commerce",
                "Marketplace startups win on supply acquisition cost; storefront tooling differentiates on time-to-first-sale.",
                "market-playbooks/ecommerce.md",
                0.8,
            ),
            doc(
                "logistics",
                "Route density, not fleet size, is the dominant margin driver for last-mile delivery startups.",
                "market-playbooks/logistics.md",
                0.85,
            ),
            doc(
                "education",
                "Adaptive learning products succeed when mastery signals feed both pacing and parent-facing reporting.",
                "market-playbooks/education.md",
                0.7,
            ),
        ])
    }
}

#[async_trait]
impl Tool for RagQueryTool {
    fn name(&self) -> &str {
        "rag_query"
    }

    fn description(&self) -> &str {
        "Query the research corpus for domain insights. Arguments: query (string), top_k (integer, default 3), min_score (number, default 0.0)."
    }

    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<Payload, ToolError> {
        let query = arguments["query"]
            .as_str()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or_else(|| {
                ToolError::InvalidArguments("rag_query needs a 'query' argument".into())
            })?;
        let top_k = arguments["top_k"].as_u64().unwrap_or(3).min(10) as usize;
        let min_score = arguments["min_score"].as_f64().unwrap_or(0.0);

        let q = query.to_lowercase();
        let mut hits: Vec<RetrievalHit> = self
            .corpus
            .iter()
            .filter(|d| q.contains(&d.topic) || d.topic.split('-').any(|part| q.contains(part)))
            .filter(|d| d.relevance >= min_score)
            .map(|d| RetrievalHit {
                content: d.content.clone(),
                source: d.source.clone(),
                score: d.relevance,
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.source.cmp(&b.source))
        });
        hits.truncate(top_k);

        Ok(Payload::RetrievalHits(hits))
    }
}
