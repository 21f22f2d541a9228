//! Funding retriever — looks up funding rounds for named companies.
//!
//! Backed by an injected list of funding events (one row per round per
//! company). The fixture covers every company in the competitor
//! fixture, so the rule-based loop's competitors-then-funding sequence
//! finds data offline.

use async_trait::async_trait;
use marketscout_core::error::ToolError;
use marketscout_core::observation::{FundingMap, FundingRound, Payload};
use marketscout_core::tool::Tool;
use serde::{Deserialize, Serialize};

/// One row of the funding dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingEvent {
    pub company: String,
    pub round: String,
    pub amount_usd: u64,
    pub date: String,
}

pub struct FundingRetrieverTool {
    events: Vec<FundingEvent>,
}

impl FundingRetrieverTool {
    pub fn new(events: Vec<FundingEvent>) -> Self {
        Self { events }
    }

    /// Built-in deterministic dataset aligned with the competitor fixture.
    pub fn fixture() -> Self {
        let event = |company: &str, round: &str, amount_usd: u64, date: &str| FundingEvent {
            company: company.into(),
            round: round.into(),
            amount_usd,
            date: date.into(),
        };
        Self::new(vec![
            event("PayTrail", "Seed", 2_500_000, "2022-06-01"),
            event("PayTrail", "Series A", 12_000_000, "2023-09-15"),
            event("LedgerLoop", "Seed", 1_800_000, "2022-11-20"),
            event("CreditNest", "Seed", 3_200_000, "2023-02-10"),
            event("CreditNest", "Series A", 15_000_000, "2024-01-08"),
            event("MediMinder", "Seed", 1_200_000, "2022-04-05"),
            event("FitPulse", "Series A", 9_000_000, "2023-07-21"),
            event("CartHopper", "Seed", 2_000_000, "2022-08-30"),
            event("ShelfWise", "Seed", 1_500_000, "2023-03-17"),
            event("LearnLadder", "Seed", 900_000, "2022-10-12"),
            event("RouteMint", "Seed", 2_700_000, "2023-05-02"),
            event("PackPilot", "Series A", 11_000_000, "2023-12-04"),
        ])
    }
}

/// Accepts `{"companies": [...]}` from the rule-based loop, or a
/// comma-separated `{"query": "..."}` from the LLM-driven one.
fn requested_companies(arguments: &serde_json::Value) -> Vec<String> {
    if let Some(items) = arguments["companies"].as_array() {
        return items
            .iter()
            .filter_map(|v| v.as_str().map(String::from))
            .collect();
    }
    if let Some(raw) = arguments["query"].as_str() {
        return raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
    }
    Vec::new()
}

#[async_trait]
impl Tool for FundingRetrieverTool {
    fn name(&self) -> &str {
        "funding_retriever"
    }

    fn description(&self) -> &str {
        "Retrieve funding rounds for companies. Arguments: companies (list of company names)."
    }

    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<Payload, ToolError> {
        let companies = requested_companies(&arguments);
        if companies.is_empty() {
            return Err(ToolError::InvalidArguments(
                "funding_retriever needs at least one company name".into(),
            ));
        }

        let mut funding = FundingMap::new();
        for company in &companies {
            let rounds: Vec<FundingRound> = self
                .events
                .iter()
                .filter(|e| e.company.eq_ignore_ascii_case(company))
                .map(|e| FundingRound {
                    round: e.round.clone(),
                    amount_usd: e.amount_usd,
                    date: e.date.clone(),
                })
                .collect();
            if !rounds.is_empty() {
                funding.insert(company.clone(), rounds);
            }
        }

        Ok(Payload::Funding(funding))
    }
}
