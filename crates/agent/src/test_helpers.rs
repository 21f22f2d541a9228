//! Shared test doubles for the agent loops: scripted tools and a
//! scripted provider. Test-only module.

use async_trait::async_trait;
use marketscout_core::error::{ProviderError, ToolError};
use marketscout_core::observation::{
    CompetitorRecord, FundingMap, FundingRound, Payload, RetrievalHit, WebResult,
};
use marketscout_core::provider::{Provider, ProviderRequest, ProviderResponse};
use marketscout_core::tool::{NO_OP, Tool, ToolRegistry};
use std::sync::Mutex;

// ── Payload fixtures ──────────────────────────────────────────────────────

pub fn competitors_payload() -> Payload {
    Payload::Competitors(vec![
        CompetitorRecord {
            name: "PayTrail".into(),
            industry: "fintech".into(),
            description: "Invoicing and payments for small businesses".into(),
            similarity: 0.8,
        },
        CompetitorRecord {
            name: "LedgerLoop".into(),
            industry: "fintech".into(),
            description: "Automated bookkeeping".into(),
            similarity: 0.6,
        },
    ])
}

pub fn funding_payload() -> Payload {
    let mut map = FundingMap::new();
    map.insert(
        "PayTrail".into(),
        vec![FundingRound {
            round: "Seed".into(),
            amount_usd: 2_500_000,
            date: "2022-03-15".into(),
        }],
    );
    Payload::Funding(map)
}

pub fn web_payload() -> Payload {
    Payload::WebResults(vec![WebResult {
        title: "Fintech trends 2026".into(),
        url: "https://example.com/fintech-trends".into(),
        snippet: "Embedded finance keeps growing".into(),
    }])
}

pub fn retrieval_payload() -> Payload {
    Payload::RetrievalHits(vec![RetrievalHit {
        content: "Payment startups with SMB focus raised record rounds".into(),
        source: "research-notes".into(),
        score: 0.85,
    }])
}

pub fn exec_error(tool_name: &str) -> ToolError {
    ToolError::ExecutionFailed {
        tool_name: tool_name.into(),
        reason: "simulated failure".into(),
    }
}

// ── Scripted tools ────────────────────────────────────────────────────────

/// Returns the same payload on every invocation.
pub struct StaticTool {
    name: String,
    payload: Payload,
}

#[async_trait]
impl Tool for StaticTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "static test tool"
    }

    async fn invoke(&self, _arguments: serde_json::Value) -> Result<Payload, ToolError> {
        Ok(self.payload.clone())
    }
}

/// Plays back a fixed sequence of results, one per invocation. Panics
/// if invoked more times than scripted.
pub struct ScriptedTool {
    name: String,
    script: Mutex<Vec<Result<Payload, ToolError>>>,
}

#[async_trait]
impl Tool for ScriptedTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "scripted test tool"
    }

    async fn invoke(&self, _arguments: serde_json::Value) -> Result<Payload, ToolError> {
        let mut script = self.script.lock().unwrap();
        assert!(!script.is_empty(), "tool {:?} invoked past its script", self.name);
        script.remove(0)
    }
}

/// Fails every invocation.
pub struct FailingTool {
    name: String,
}

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "always-failing test tool"
    }

    async fn invoke(&self, _arguments: serde_json::Value) -> Result<Payload, ToolError> {
        Err(exec_error(&self.name))
    }
}

pub fn static_tool(name: &str, payload: Payload) -> Box<dyn Tool> {
    Box::new(StaticTool {
        name: name.into(),
        payload,
    })
}

pub fn scripted_tool(name: &str, script: Vec<Result<Payload, ToolError>>) -> Box<dyn Tool> {
    Box::new(ScriptedTool {
        name: name.into(),
        script: Mutex::new(script),
    })
}

pub fn failing_tool(name: &str) -> Box<dyn Tool> {
    Box::new(FailingTool { name: name.into() })
}

pub fn competitors_tool() -> Box<dyn Tool> {
    static_tool("competitor_finder", competitors_payload())
}

pub fn funding_tool() -> Box<dyn Tool> {
    static_tool("funding_retriever", funding_payload())
}

pub fn web_tool() -> Box<dyn Tool> {
    static_tool("web_search", web_payload())
}

pub fn retrieval_tool() -> Box<dyn Tool> {
    static_tool("rag_query", retrieval_payload())
}

pub fn no_op_tool() -> Box<dyn Tool> {
    static_tool(NO_OP, Payload::Empty)
}

// ── Registry builders ─────────────────────────────────────────────────────

pub fn registry_with(tools: Vec<Box<dyn Tool>>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for tool in tools {
        registry.register(tool);
    }
    registry
}

/// All four tools answering on the first call, plus the sentinel.
pub fn happy_registry() -> ToolRegistry {
    registry_with(vec![
        competitors_tool(),
        funding_tool(),
        web_tool(),
        retrieval_tool(),
        no_op_tool(),
    ])
}

/// Every tool faults on every call.
pub fn failing_registry() -> ToolRegistry {
    registry_with(vec![
        failing_tool("competitor_finder"),
        failing_tool("funding_retriever"),
        failing_tool("web_search"),
        failing_tool("rag_query"),
        no_op_tool(),
    ])
}

// ── Scripted provider ─────────────────────────────────────────────────────

/// Plays back a fixed sequence of completion results. Panics if asked
/// for more completions than scripted.
pub struct SequentialMockProvider {
    responses: Mutex<Vec<Result<ProviderResponse, ProviderError>>>,
}

impl SequentialMockProvider {
    pub fn new(responses: Vec<Result<ProviderResponse, ProviderError>>) -> Self {
        Self {
            responses: Mutex::new(responses),
        }
    }

    /// Convenience for all-success scripts.
    pub fn replies(contents: &[&str]) -> Self {
        Self::new(contents.iter().map(|c| Ok(reply(c))).collect())
    }
}

pub fn reply(content: &str) -> ProviderResponse {
    ProviderResponse {
        content: content.to_string(),
        model: "mock".into(),
        usage: None,
    }
}

#[async_trait]
impl Provider for SequentialMockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        _request: ProviderRequest,
    ) -> Result<ProviderResponse, ProviderError> {
        let mut responses = self.responses.lock().unwrap();
        assert!(!responses.is_empty(), "provider asked past its script");
        responses.remove(0)
    }
}
