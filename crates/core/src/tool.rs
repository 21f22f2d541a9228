//! Tool trait — the abstraction over research capabilities.
//!
//! Tools are the agent's only way to gather evidence: competitor lookup,
//! funding lookup, web search, semantic retrieval. Each tool is read-only
//! from the caller's perspective and returns `Result<Payload, ToolError>`,
//! so swallowed exceptions cannot happen by accident.
//!
//! [`ToolRegistry::execute`] is the no-throw boundary: lookup failures,
//! execution errors, and per-call timeouts are all converted into error
//! observations there, which is what lets the dispatch loop treat every
//! tool uniformly.

use crate::error::ToolError;
use crate::observation::{Observation, Payload};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

/// Name of the sentinel pseudo-tool that always returns empty success.
pub const NO_OP: &str = "no_op";

/// Default per-call timeout. A blocking tool must not stall the run.
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// One dispatch decision: which tool to invoke, with what arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Registered tool name, or the [`NO_OP`] sentinel.
    pub tool_name: String,

    /// Arguments as a JSON object.
    pub arguments: serde_json::Value,

    /// When the decision was made.
    pub timestamp: DateTime<Utc>,
}

impl ToolCall {
    pub fn new(tool_name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments,
            timestamp: Utc::now(),
        }
    }

    /// The sentinel call recorded when no further evidence is needed.
    pub fn no_op() -> Self {
        Self::new(NO_OP, serde_json::json!({}))
    }
}

/// The core Tool trait.
///
/// Each capability (competitor finder, funding retriever, web search,
/// retrieval query) implements this trait and is registered in the
/// [`ToolRegistry`] for the dispatch loop to invoke by name.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g. "competitor_finder").
    fn name(&self) -> &str;

    /// What this tool does, for trace rendering and model prompts.
    fn description(&self) -> &str;

    /// Execute the tool with the given arguments.
    async fn invoke(&self, arguments: serde_json::Value)
    -> std::result::Result<Payload, ToolError>;
}

/// A registry of available tools.
///
/// The dispatch loop uses this to look up and execute tools; the
/// LLM-driven variant additionally uses [`ToolRegistry::catalog`] to
/// enumerate the allowed action set for the model.
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
    call_timeout: Duration,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Set the per-call timeout applied to every tool invocation.
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// List all registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Name and description of every registered tool, sorted by name.
    pub fn catalog(&self) -> Vec<(String, String)> {
        let mut entries: Vec<(String, String)> = self
            .tools
            .values()
            .map(|t| (t.name().to_string(), t.description().to_string()))
            .collect();
        entries.sort_unstable();
        entries
    }

    /// Execute a tool call. This never fails from the caller's
    /// perspective: every fault becomes an error observation.
    pub async fn execute(&self, call: &ToolCall) -> Observation {
        let Some(tool) = self.tools.get(&call.tool_name) else {
            warn!(tool = %call.tool_name, "tool not found in registry");
            return Observation::from_tool_error(&ToolError::NotFound(call.tool_name.clone()));
        };

        let invocation = tool.invoke(call.arguments.clone());
        match tokio::time::timeout(self.call_timeout, invocation).await {
            Ok(Ok(payload)) => {
                debug!(tool = %call.tool_name, result = %payload.summary(), "tool executed");
                Observation::success(payload)
            }
            Ok(Err(err)) => {
                warn!(tool = %call.tool_name, error = %err, "tool failed");
                Observation::from_tool_error(&err)
            }
            Err(_) => {
                warn!(tool = %call.tool_name, timeout_secs = self.call_timeout.as_secs(), "tool timed out");
                Observation::from_tool_error(&ToolError::Timeout {
                    tool_name: call.tool_name.clone(),
                    timeout_secs: self.call_timeout.as_secs(),
                })
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observation::{ObservationErrorKind, WebResult};

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }
        fn description(&self) -> &str {
            "Echoes the query back as a single web result"
        }
        async fn invoke(
            &self,
            arguments: serde_json::Value,
        ) -> std::result::Result<Payload, ToolError> {
            let query = arguments["query"].as_str().unwrap_or("").to_string();
            Ok(Payload::WebResults(vec![WebResult {
                title: query.clone(),
                url: String::new(),
                snippet: query,
            }]))
        }
    }

    struct FaultyTool;

    #[async_trait]
    impl Tool for FaultyTool {
        fn name(&self) -> &str {
            "faulty"
        }
        fn description(&self) -> &str {
            "Always fails"
        }
        async fn invoke(
            &self,
            _arguments: serde_json::Value,
        ) -> std::result::Result<Payload, ToolError> {
            Err(ToolError::ExecutionFailed {
                tool_name: "faulty".into(),
                reason: "dataset missing".into(),
            })
        }
    }

    struct SlowTool;

    #[async_trait]
    impl Tool for SlowTool {
        fn name(&self) -> &str {
            "slow"
        }
        fn description(&self) -> &str {
            "Never finishes in time"
        }
        async fn invoke(
            &self,
            _arguments: serde_json::Value,
        ) -> std::result::Result<Payload, ToolError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(Payload::Empty)
        }
    }

    #[test]
    fn register_and_lookup() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));
        assert!(registry.get("echo").is_some());
        assert!(registry.get("nonexistent").is_none());
        assert!(registry.contains("echo"));
        assert_eq!(registry.names(), vec!["echo"]);
    }

    #[tokio::test]
    async fn execute_success() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(EchoTool));

        let call = ToolCall::new("echo", serde_json::json!({"query": "fintech trends"}));
        let obs = registry.execute(&call).await;
        assert!(!obs.is_error());
        assert!(!obs.is_empty_success());
    }

    #[tokio::test]
    async fn execute_missing_tool_is_recorded_not_raised() {
        let registry = ToolRegistry::new();
        let call = ToolCall::new("nonexistent", serde_json::json!({}));
        let obs = registry.execute(&call).await;
        assert!(matches!(
            obs,
            Observation::Error {
                kind: ObservationErrorKind::ToolNotFound,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn execute_fault_is_recorded_not_raised() {
        let mut registry = ToolRegistry::new();
        registry.register(Box::new(FaultyTool));
        let obs = registry.execute(&ToolCall::new("faulty", serde_json::json!({}))).await;
        assert!(matches!(
            obs,
            Observation::Error {
                kind: ObservationErrorKind::ExecutionFailed,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn execute_enforces_call_timeout() {
        let mut registry = ToolRegistry::new().with_call_timeout(Duration::from_millis(10));
        registry.register(Box::new(SlowTool));
        let obs = registry.execute(&ToolCall::new("slow", serde_json::json!({}))).await;
        assert!(matches!(
            obs,
            Observation::Error {
                kind: ObservationErrorKind::Timeout,
                ..
            }
        ));
    }
}
