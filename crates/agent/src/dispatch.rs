//! Rule-based dispatch loop — deterministic gap-driven tool selection.
//!
//! Each iteration inspects which collected-data categories are still
//! empty, in a fixed priority order, and maps the first open gap
//! directly to a tool call. The gap is an explicit enum, not substring
//! matching on the thought text, so the thought is documentation of the
//! decision rather than its input. An empty web search can trigger one
//! bounded fallback to semantic retrieval before the loop continues.
//!
//! The loop never raises: tool faults arrive as error observations and
//! count as "gap still open". When the iteration budget runs out the
//! run terminates in a partial state that downstream consumers must
//! tolerate.

use crate::working_memory::{RunStatus, WorkingMemory};
use marketscout_config::DispatchConfig;
use marketscout_core::input::ParsedInput;
use marketscout_core::observation::Category;
use marketscout_core::tool::{ToolCall, ToolRegistry};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// An evidence category the run has not covered yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfoGap {
    Competitors,
    Funding,
    WebResults,
    Retrieval,
}

impl InfoGap {
    /// The first open gap in priority order, or `None` when all four
    /// categories are populated.
    fn next(collected: &crate::working_memory::CollectedData) -> Option<InfoGap> {
        if !collected.has(Category::Competitors) {
            Some(InfoGap::Competitors)
        } else if !collected.has(Category::Funding) {
            Some(InfoGap::Funding)
        } else if !collected.has(Category::WebResults) {
            Some(InfoGap::WebResults)
        } else if !collected.has(Category::RetrievalResults) {
            Some(InfoGap::Retrieval)
        } else {
            None
        }
    }

    /// Why this gap was selected, in the run's own words.
    fn thought(&self, input: &ParsedInput) -> String {
        match self {
            InfoGap::Competitors => format!(
                "I need to find competitors in the {} domain",
                input.domain_or_default()
            ),
            InfoGap::Funding => {
                "I should retrieve funding data for the identified competitors".into()
            }
            InfoGap::WebResults => format!(
                "I need to search for market trends in {}",
                input.domain_or_default()
            ),
            InfoGap::Retrieval => {
                "I should query the research corpus for additional context".into()
            }
        }
    }

    /// Map the gap to exactly one tool call. Funding arguments come
    /// from the competitors already collected.
    fn tool_call(
        &self,
        input: &ParsedInput,
        collected: &crate::working_memory::CollectedData,
    ) -> ToolCall {
        let domain = input.domain_or_default();
        match self {
            InfoGap::Competitors => ToolCall::new(
                "competitor_finder",
                json!({"domain": input.domain, "features": input.key_features}),
            ),
            InfoGap::Funding => ToolCall::new(
                "funding_retriever",
                json!({"companies": collected.competitor_names()}),
            ),
            InfoGap::WebResults => ToolCall::new(
                "web_search",
                json!({"query": format!("{domain} market trends"), "num_results": 5}),
            ),
            InfoGap::Retrieval => ToolCall::new(
                "rag_query",
                json!({"query": format!("{domain} startup success factors"), "top_k": 3}),
            ),
        }
    }
}

/// The outcome of a rule-based run: the frozen memory plus how the run
/// ended. Partial runs are valid results, not errors.
#[derive(Debug)]
pub struct SurveyOutcome {
    pub memory: WorkingMemory,
    pub status: RunStatus,
}

/// The rule-based dispatch loop.
pub struct SurveyAgent {
    registry: Arc<ToolRegistry>,
    config: DispatchConfig,
}

impl SurveyAgent {
    pub fn new(registry: Arc<ToolRegistry>, config: DispatchConfig) -> Self {
        Self { registry, config }
    }

    /// Run the loop to completion. This function cannot fail: every
    /// fault is recorded in the returned memory instead.
    pub async fn run(&self, input: &ParsedInput) -> SurveyOutcome {
        let mut wm = WorkingMemory::new(self.config.max_iterations as usize);

        info!(
            domain = %input.domain_or_default(),
            max_iterations = self.config.max_iterations,
            "dispatch loop starting"
        );

        let status = loop {
            if !wm.tick() {
                warn!(
                    iterations = wm.max_iterations,
                    "iteration budget exhausted, terminating partially"
                );
                break RunStatus::Partial;
            }

            let Some(gap) = InfoGap::next(&wm.collected) else {
                // All four categories covered: record the closing
                // thought against the sentinel and stop.
                let call = ToolCall::no_op();
                let observation = self.registry.execute(&call).await;
                wm.record(
                    "I have collected sufficient data for analysis",
                    call,
                    observation,
                );
                break RunStatus::Complete;
            };

            let thought = gap.thought(input);
            let call = gap.tool_call(input, &wm.collected);
            debug!(iteration = wm.iterations, gap = ?gap, tool = %call.tool_name, "dispatching");

            let observation = self.registry.execute(&call).await;
            let fallback_wanted = gap == InfoGap::WebResults && observation.is_empty_success();
            wm.record(thought, call, observation);

            // An empty web search burns a fallback attempt on semantic
            // retrieval, bounded separately from the main budget.
            if fallback_wanted
                && self.config.use_fallback
                && wm.fallback_attempts < self.config.max_fallback_attempts
            {
                let domain = input.domain_or_default();
                let call = ToolCall::new(
                    "rag_query",
                    json!({
                        "query": format!("{domain} market trends insights"),
                        "top_k": 3,
                        "min_score": self.config.fallback_min_score,
                    }),
                );
                debug!(attempt = wm.fallback_attempts + 1, "web search empty, falling back to retrieval");
                let observation = self.registry.execute(&call).await;
                wm.fallback_attempts += 1;
                wm.record(
                    format!("Web search found nothing, querying the research corpus about {domain} instead"),
                    call,
                    observation,
                );
            }

            if wm.collected.is_satisfied() {
                break RunStatus::Complete;
            }
        };

        info!(
            status = ?status,
            iterations = wm.iterations.min(wm.max_iterations),
            tool_calls = wm.tool_calls.len(),
            fallbacks = wm.fallback_attempts,
            "dispatch loop finished"
        );

        SurveyOutcome { memory: wm, status }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use marketscout_core::observation::{Observation, Payload};

    fn fintech_input() -> ParsedInput {
        ParsedInput {
            core_idea: "invoicing for small businesses".into(),
            domain: "FinTech".into(),
            key_features: vec![],
            target_audience: "SMB".into(),
        }
    }

    fn config(max_iterations: u32, max_fallback_attempts: u32) -> DispatchConfig {
        DispatchConfig {
            max_iterations,
            max_fallback_attempts,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn scenario_all_tools_succeed_first_try() {
        // competitors, funding, web results each land on first call:
        // exactly 3 main iterations, no fallback.
        let registry = Arc::new(happy_registry());
        let agent = SurveyAgent::new(registry, config(10, 2));

        let outcome = agent.run(&fintech_input()).await;
        assert_eq!(outcome.status, RunStatus::Complete);
        assert_eq!(outcome.memory.iterations, 3);
        assert_eq!(outcome.memory.tool_calls.len(), 3);
        assert_eq!(outcome.memory.fallback_attempts, 0);
        assert!(outcome.memory.collected.is_satisfied());
        assert!(outcome.memory.collected.retrieval_results.is_empty());
    }

    #[tokio::test]
    async fn scenario_empty_web_search_falls_back_to_retrieval() {
        let mut registry = registry_with(vec![
            competitors_tool(),
            funding_tool(),
            static_tool("web_search", Payload::WebResults(vec![])),
            static_tool("rag_query", retrieval_payload()),
        ]);
        registry.register(no_op_tool());
        let agent = SurveyAgent::new(Arc::new(registry), config(10, 2));

        let outcome = agent.run(&fintech_input()).await;
        assert_eq!(outcome.status, RunStatus::Complete);
        assert_eq!(outcome.memory.fallback_attempts, 1);
        assert!(outcome.memory.collected.web_results.is_empty());
        assert!(!outcome.memory.collected.retrieval_results.is_empty());
        // 3 main calls plus the fallback call
        assert_eq!(outcome.memory.tool_calls.len(), 4);
    }

    #[tokio::test]
    async fn scenario_every_tool_faults() {
        let registry = Arc::new(failing_registry());
        let agent = SurveyAgent::new(registry, config(5, 2));

        let outcome = agent.run(&fintech_input()).await;
        assert_eq!(outcome.status, RunStatus::Partial);
        assert_eq!(outcome.memory.iterations, 6); // budget 5, 6th tick fails
        assert_eq!(outcome.memory.observations.len(), 5);
        assert!(outcome.memory.observations.iter().all(Observation::is_error));
        assert!(!outcome.memory.collected.has(Category::Competitors));
        assert!(!outcome.memory.collected.has(Category::Funding));
        assert!(!outcome.memory.collected.has(Category::WebResults));
        assert!(!outcome.memory.collected.has(Category::RetrievalResults));
    }

    #[tokio::test]
    async fn fallback_attempts_are_bounded() {
        // Web search stays empty and retrieval finds nothing either, so
        // the web gap never closes. Fallback calls must stop at the cap
        // while the main loop runs to its own budget.
        let mut registry = registry_with(vec![
            competitors_tool(),
            funding_tool(),
            static_tool("web_search", Payload::WebResults(vec![])),
            static_tool("rag_query", Payload::RetrievalHits(vec![])),
        ]);
        registry.register(no_op_tool());
        let agent = SurveyAgent::new(Arc::new(registry), config(8, 2));

        let outcome = agent.run(&fintech_input()).await;
        assert_eq!(outcome.status, RunStatus::Partial);
        assert_eq!(outcome.memory.fallback_attempts, 2);

        let fallback_calls = outcome
            .memory
            .tool_calls
            .iter()
            .filter(|c| c.tool_name == "rag_query")
            .count();
        assert_eq!(fallback_calls, 2);
        // bounded by N main calls + k fallbacks
        assert!(outcome.memory.tool_calls.len() <= 8 + 2);
    }

    #[tokio::test]
    async fn error_observation_leaves_gap_open_for_retry() {
        // competitor_finder fails twice then succeeds; the loop keeps
        // re-selecting the competitors gap without repeating within an
        // iteration.
        let mut registry = registry_with(vec![
            scripted_tool(
                "competitor_finder",
                vec![
                    Err(exec_error("competitor_finder")),
                    Err(exec_error("competitor_finder")),
                    Ok(competitors_payload()),
                ],
            ),
            funding_tool(),
            web_tool(),
            static_tool("rag_query", retrieval_payload()),
        ]);
        registry.register(no_op_tool());
        let agent = SurveyAgent::new(Arc::new(registry), config(10, 2));

        let outcome = agent.run(&fintech_input()).await;
        assert_eq!(outcome.status, RunStatus::Complete);
        // 2 failed + 1 successful competitor calls, then funding + web
        assert_eq!(outcome.memory.iterations, 5);
        assert_eq!(
            outcome
                .memory
                .tool_calls
                .iter()
                .filter(|c| c.tool_name == "competitor_finder")
                .count(),
            3
        );
    }

    #[tokio::test]
    async fn missing_tool_is_nonfatal() {
        // No funding_retriever registered: its gap stays open and the
        // run exhausts the budget without raising.
        let mut registry = registry_with(vec![competitors_tool(), web_tool()]);
        registry.register(no_op_tool());
        let agent = SurveyAgent::new(Arc::new(registry), config(4, 0));

        let outcome = agent.run(&fintech_input()).await;
        assert_eq!(outcome.status, RunStatus::Partial);
        assert!(outcome.memory.observations.iter().any(Observation::is_error));
    }

    #[tokio::test]
    async fn funding_arguments_use_collected_competitor_names() {
        let registry = Arc::new(happy_registry());
        let agent = SurveyAgent::new(registry, config(10, 2));

        let outcome = agent.run(&fintech_input()).await;
        let funding_call = outcome
            .memory
            .tool_calls
            .iter()
            .find(|c| c.tool_name == "funding_retriever")
            .expect("funding call recorded");
        let companies: Vec<String> = funding_call.arguments["companies"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        assert_eq!(companies, outcome.memory.collected.competitor_names());
        assert!(!companies.is_empty());
    }

    #[tokio::test]
    async fn fallback_disabled_by_config() {
        let mut registry = registry_with(vec![
            competitors_tool(),
            funding_tool(),
            static_tool("web_search", Payload::WebResults(vec![])),
            static_tool("rag_query", retrieval_payload()),
        ]);
        registry.register(no_op_tool());
        let agent = SurveyAgent::new(
            Arc::new(registry),
            DispatchConfig {
                max_iterations: 4,
                use_fallback: false,
                ..Default::default()
            },
        );

        let outcome = agent.run(&fintech_input()).await;
        assert_eq!(outcome.memory.fallback_attempts, 0);
        assert!(
            !outcome
                .memory
                .tool_calls
                .iter()
                .any(|c| c.tool_name == "rag_query")
        );
        assert_eq!(outcome.status, RunStatus::Partial);
    }
}
