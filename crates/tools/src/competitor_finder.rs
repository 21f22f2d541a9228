//! Competitor finder — keyword-overlap search over startup profiles.
//!
//! The dataset is injected at construction, never loaded from module
//! state, so the same tool can be backed by a real startup dataset or
//! the built-in fixture. Scoring is plain token overlap between the
//! parsed idea (domain + features) and each profile's industry,
//! description, and tags.

use async_trait::async_trait;
use marketscout_core::error::ToolError;
use marketscout_core::observation::{CompetitorRecord, Payload};
use marketscout_core::tool::Tool;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// How many competitors to return at most.
const MAX_RESULTS: usize = 5;

/// One row of the startup dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartupProfile {
    pub name: String,
    pub industry: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

pub struct CompetitorFinderTool {
    profiles: Vec<StartupProfile>,
}

impl CompetitorFinderTool {
    /// Build over an injected dataset.
    pub fn new(profiles: Vec<StartupProfile>) -> Self {
        Self { profiles }
    }

    /// Built-in deterministic dataset covering the common demo domains.
    pub fn fixture() -> Self {
        let profile = |name: &str, industry: &str, description: &str, tags: &[&str]| {
            StartupProfile {
                name: name.into(),
                industry: industry.into(),
                description: description.into(),
                tags: tags.iter().map(|t| (*t).into()).collect(),
            }
        };
        Self::new(vec![
            profile(
                "PayTrail",
                "fintech",
                "Payment orchestration and invoicing platform for small businesses",
                &["payments", "smb", "invoicing"],
            ),
            profile(
                "LedgerLoop",
                "fintech",
                "Automated bookkeeping and expense tracking for startups",
                &["accounting", "expense", "automation"],
            ),
            profile(
                "CreditNest",
                "fintech",
                "Credit scoring and lending analytics for underbanked consumers",
                &["lending", "credit", "analytics"],
            ),
            profile(
                "MediMinder",
                "health",
                "Medication reminder and wellness tracking app",
                &["wellness", "tracking", "mobile"],
            ),
            profile(
                "FitPulse",
                "health",
                "Fitness coaching platform with wearable integration",
                &["fitness", "wearables", "coaching"],
            ),
            profile(
                "CartHopper",
                "e-commerce",
                "Marketplace storefront builder for independent retailers",
                &["marketplace", "retail", "storefront"],
            ),
            profile(
                "ShelfWise",
                "e-commerce",
                "Inventory forecasting for online stores",
                &["inventory", "forecasting", "retail"],
            ),
            profile(
                "LearnLadder",
                "education",
                "Adaptive learning courses for high school students",
                &["learning", "courses", "adaptive"],
            ),
            profile(
                "RouteMint",
                "logistics",
                "Delivery route optimization for local couriers",
                &["delivery", "routing", "couriers"],
            ),
            profile(
                "PackPilot",
                "logistics",
                "Warehouse packing automation for e-commerce fulfillment",
                &["warehouse", "automation", "fulfillment"],
            ),
        ])
    }
}

/// Lowercased alphanumeric tokens, deduplicated, short noise dropped.
fn tokenize(text: &str) -> BTreeSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .map(str::to_lowercase)
        .filter(|t| t.len() >= 3)
        .collect()
}

#[async_trait]
impl Tool for CompetitorFinderTool {
    fn name(&self) -> &str {
        "competitor_finder"
    }

    fn description(&self) -> &str {
        "Find competitors in a business domain. Arguments: domain (string), features (list of strings)."
    }

    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<Payload, ToolError> {
        // The rule-based loop passes "domain"; the LLM-driven loop may
        // only supply a free-text "query".
        let domain = arguments["domain"]
            .as_str()
            .or_else(|| arguments["query"].as_str())
            .unwrap_or("");
        let features: Vec<String> = arguments["features"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(String::from))
                    .collect()
            })
            .unwrap_or_default();

        let mut needle = domain.to_string();
        for feature in &features {
            needle.push(' ');
            needle.push_str(feature);
        }
        let tokens = tokenize(&needle);
        if tokens.is_empty() {
            return Err(ToolError::InvalidArguments(
                "competitor_finder needs a non-empty domain or query".into(),
            ));
        }

        let mut scored: Vec<(usize, CompetitorRecord)> = self
            .profiles
            .iter()
            .filter_map(|p| {
                let haystack = format!("{} {} {}", p.industry, p.description, p.tags.join(" "))
                    .to_lowercase();
                let hits = tokens.iter().filter(|t| haystack.contains(t.as_str())).count();
                (hits > 0).then(|| {
                    (
                        hits,
                        CompetitorRecord {
                            name: p.name.clone(),
                            industry: p.industry.clone(),
                            description: p.description.clone(),
                            similarity: hits as f64 / tokens.len() as f64,
                        },
                    )
                })
            })
            .collect();

        // Deterministic order: best overlap first, name as tiebreaker.
        scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.name.cmp(&b.1.name)));
        let records: Vec<CompetitorRecord> = scored
            .into_iter()
            .take(MAX_RESULTS)
            .map(|(_, r)| r)
            .collect();

        Ok(Payload::Competitors(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn finds_fintech_competitors() {
        let tool = CompetitorFinderTool::fixture();
        let payload = tool
            .invoke(serde_json::json!({"domain": "FinTech", "features": ["payments"]}))
            .await
            .unwrap();

        let Payload::Competitors(records) = payload else {
            panic!("expected competitors payload");
        };
        assert!(!records.is_empty());
        // Payments feature should rank PayTrail first.
        assert_eq!(records[0].name, "PayTrail");
        assert!(records.iter().all(|r| r.industry == "fintech"));
    }

    #[tokio::test]
    async fn unknown_domain_yields_empty() {
        let tool = CompetitorFinderTool::fixture();
        let payload = tool
            .invoke(serde_json::json!({"domain": "submarine mining"}))
            .await
            .unwrap();
        assert!(payload.is_empty());
    }

    #[tokio::test]
    async fn query_argument_accepted() {
        let tool = CompetitorFinderTool::fixture();
        let payload = tool
            .invoke(serde_json::json!({"query": "logistics delivery"}))
            .await
            .unwrap();
        let Payload::Competitors(records) = payload else {
            panic!("expected competitors payload");
        };
        assert!(records.iter().any(|r| r.name == "RouteMint"));
    }

    #[tokio::test]
    async fn empty_arguments_rejected() {
        let tool = CompetitorFinderTool::fixture();
        let err = tool.invoke(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn results_are_deterministic() {
        let tool = CompetitorFinderTool::fixture();
        let args = serde_json::json!({"domain": "e-commerce retail"});
        let first = tool.invoke(args.clone()).await.unwrap();
        let second = tool.invoke(args).await.unwrap();
        assert_eq!(first, second);
    }
}
