//! Web search — fixture and live variants behind the same tool name.
//!
//! The fixture returns plausible canned results keyed on query topics
//! so the dispatch loop can be exercised end-to-end without network
//! access. The live variant posts to a Serper-style JSON endpoint.
//! Which one lands in the registry is decided by configuration at
//! wiring time, never by branches inside the loop.

use async_trait::async_trait;
use marketscout_core::error::ToolError;
use marketscout_core::observation::{Payload, WebResult};
use marketscout_core::tool::Tool;
use serde::Deserialize;
use tracing::debug;

fn query_argument(arguments: &serde_json::Value) -> std::result::Result<String, ToolError> {
    arguments["query"]
        .as_str()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(String::from)
        .ok_or_else(|| ToolError::InvalidArguments("web_search needs a 'query' argument".into()))
}

// ── Fixture variant ───────────────────────────────────────────────────────

pub struct FixtureWebSearchTool;

impl FixtureWebSearchTool {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FixtureWebSearchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for FixtureWebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for market news and trends. Arguments: query (string), num_results (integer, default 5)."
    }

    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<Payload, ToolError> {
        let query = query_argument(&arguments)?;
        let num_results = arguments["num_results"].as_u64().unwrap_or(5).min(10) as usize;
        Ok(Payload::WebResults(canned_results(&query, num_results)))
    }
}

fn canned_results(query: &str, count: usize) -> Vec<WebResult> {
    let q = query.to_lowercase();
    let result = |title: &str, url: &str, snippet: &str| WebResult {
        title: title.into(),
        url: url.into(),
        snippet: snippet.into(),
    };

    let topical: Vec<WebResult> = if q.contains("fintech") || q.contains("payment") {
        vec![
            result(
                "Fintech funding rebounds as embedded finance matures",
                "https://news.example.com/fintech-rebound",
                "Investors return to payments and SMB banking infrastructure after two slow quarters.",
            ),
            result(
                "SMB payment platforms consolidate",
                "https://news.example.com/smb-payments",
                "Mid-size payment orchestration startups merge to compete on processing margins.",
            ),
        ]
    } else if q.contains("health") || q.contains("wellness") || q.contains("fitness") {
        vec![
            result(
                "Digital health apps shift to outcome-based pricing",
                "https://news.example.com/digital-health-pricing",
                "Wellness platforms tie subscription fees to measured engagement and outcomes.",
            ),
            result(
                "Wearable integration becomes table stakes",
                "https://news.example.com/wearables",
                "Fitness and medication apps race to support the major wearable ecosystems.",
            ),
        ]
    } else if q.contains("commerce") || q.contains("retail") || q.contains("marketplace") {
        vec![
            result(
                "Independent retailers lean on AI storefront tooling",
                "https://news.example.com/ai-storefronts",
                "Marketplace builders add assortment and pricing automation for small sellers.",
            ),
            result(
                "Inventory forecasting startups attract late-stage capital",
                "https://news.example.com/inventory-forecasting",
                "Retail analytics vendors report strong demand from online stores.",
            ),
        ]
    } else if q.contains("logistics") || q.contains("delivery") || q.contains("warehouse") {
        vec![
            result(
                "Last-mile routing costs fall with smarter dispatch",
                "https://news.example.com/last-mile",
                "Courier networks adopt route optimization to cut per-drop cost.",
            ),
            result(
                "Warehouse automation trends",
                "https://news.example.com/warehouse-automation",
                "Vision systems and robotics reduce packing time for fulfillment centers.",
            ),
        ]
    } else if q.contains("education") || q.contains("learning") {
        vec![result(
            "Adaptive learning platforms expand beyond test prep",
            "https://news.example.com/adaptive-learning",
            "Course providers personalize pacing using mastery models.",
        )]
    } else {
        // Generic trend results so unfamiliar domains still get coverage.
        vec![result(
            &format!("Market overview: {query}"),
            "https://news.example.com/market-overview",
            &format!("Analysts summarize current activity and outlook for {query}."),
        )]
    };

    topical.into_iter().take(count).collect()
}

// ── Live variant ──────────────────────────────────────────────────────────

/// Live search over a Serper-style JSON API.
pub struct LiveWebSearchTool {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    num_results: usize,
}

impl LiveWebSearchTool {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, num_results: usize) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(20))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            num_results,
        }
    }
}

#[derive(Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Deserialize)]
struct SerperResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

#[async_trait]
impl Tool for LiveWebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web for market news and trends. Arguments: query (string), num_results (integer, default 5)."
    }

    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> std::result::Result<Payload, ToolError> {
        let query = query_argument(&arguments)?;
        let num_results = arguments["num_results"]
            .as_u64()
            .map(|n| n as usize)
            .unwrap_or(self.num_results);

        debug!(query = %query, "live web search");

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&serde_json::json!({"q": query, "num": num_results}))
            .send()
            .await
            .map_err(|e| ToolError::ExecutionFailed {
                tool_name: "web_search".into(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(ToolError::ExecutionFailed {
                tool_name: "web_search".into(),
                reason: format!("search API returned status {}", response.status()),
            });
        }

        let parsed: SerperResponse =
            response.json().await.map_err(|e| ToolError::ExecutionFailed {
                tool_name: "web_search".into(),
                reason: format!("malformed search response: {e}"),
            })?;

        let results: Vec<WebResult> = parsed
            .organic
            .into_iter()
            .take(num_results)
            .map(|r| WebResult {
                title: r.title,
                url: r.link,
                snippet: r.snippet,
            })
            .collect();

        Ok(Payload::WebResults(results))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_returns_topical_results() {
        let tool = FixtureWebSearchTool::new();
        let payload = tool
            .invoke(serde_json::json!({"query": "fintech market trends"}))
            .await
            .unwrap();
        let Payload::WebResults(results) = payload else {
            panic!("expected web results");
        };
        assert!(!results.is_empty());
        assert!(results[0].title.to_lowercase().contains("fintech"));
    }

    #[tokio::test]
    async fn fixture_covers_unknown_domains_generically() {
        let tool = FixtureWebSearchTool::new();
        let payload = tool
            .invoke(serde_json::json!({"query": "beekeeping market trends"}))
            .await
            .unwrap();
        assert!(!payload.is_empty());
    }

    #[tokio::test]
    async fn num_results_respected() {
        let tool = FixtureWebSearchTool::new();
        let payload = tool
            .invoke(serde_json::json!({"query": "logistics trends", "num_results": 1}))
            .await
            .unwrap();
        let Payload::WebResults(results) = payload else {
            panic!("expected web results");
        };
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn missing_query_rejected() {
        let tool = FixtureWebSearchTool::new();
        let err = tool.invoke(serde_json::json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[test]
    fn serper_response_parsing() {
        let raw = r#"{"organic": [{"title": "T", "link": "https://x", "snippet": "S"}]}"#;
        let parsed: SerperResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.organic.len(), 1);
        assert_eq!(parsed.organic[0].title, "T");
    }
}
