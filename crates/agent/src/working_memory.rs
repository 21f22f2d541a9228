//! Working memory — the full audit trail of one research run.
//!
//! Stores the ordered thoughts, tool calls, and observations (tool
//! calls and observations stay index-aligned), plus the derived
//! collected-data buckets. The memory is owned exclusively by the
//! dispatch loop while it runs and handed out frozen (by value) when
//! the run terminates, so downstream consumers never see it mutate.

use marketscout_core::observation::{
    Category, CompetitorRecord, FundingMap, Observation, Payload, RetrievalHit, WebResult,
};
use marketscout_core::tool::ToolCall;
use serde::{Deserialize, Serialize};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The stopping predicate was satisfied.
    Complete,
    /// The iteration budget ran out first; categories may be empty.
    Partial,
}

/// The derived data buckets, one per evidence category.
///
/// Updates are last-write-wins per category, with one guard: an empty
/// payload never replaces a populated bucket, so progress is monotone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollectedData {
    pub competitors: Vec<CompetitorRecord>,
    pub funding: FundingMap,
    pub web_results: Vec<WebResult>,
    pub retrieval_results: Vec<RetrievalHit>,
}

impl CollectedData {
    pub fn has(&self, category: Category) -> bool {
        match category {
            Category::Competitors => !self.competitors.is_empty(),
            Category::Funding => !self.funding.is_empty(),
            Category::WebResults => !self.web_results.is_empty(),
            Category::RetrievalResults => !self.retrieval_results.is_empty(),
        }
    }

    /// Fold a success payload into its bucket. Returns `true` when the
    /// bucket was updated.
    pub fn absorb(&mut self, payload: &Payload) -> bool {
        if payload.is_empty() {
            return false;
        }
        match payload {
            Payload::Competitors(records) => self.competitors = records.clone(),
            Payload::Funding(map) => self.funding = map.clone(),
            Payload::WebResults(results) => self.web_results = results.clone(),
            Payload::RetrievalHits(hits) => self.retrieval_results = hits.clone(),
            Payload::Empty => return false,
        }
        true
    }

    /// The stopping predicate: competitors and funding are covered, and
    /// at least one of the breadth categories (web or retrieval) is too.
    pub fn is_satisfied(&self) -> bool {
        self.has(Category::Competitors)
            && self.has(Category::Funding)
            && (self.has(Category::WebResults) || self.has(Category::RetrievalResults))
    }

    /// Names of companies found so far, in result order. Used to build
    /// the funding lookup arguments.
    pub fn competitor_names(&self) -> Vec<String> {
        self.competitors.iter().map(|c| c.name.clone()).collect()
    }
}

/// The full run state of one dispatch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingMemory {
    /// Natural-language rationale per decision, in order.
    pub thoughts: Vec<String>,

    /// Every dispatch decision, in order.
    pub tool_calls: Vec<ToolCall>,

    /// Exactly one observation per tool call, same order.
    pub observations: Vec<Observation>,

    /// Derived category buckets.
    pub collected: CollectedData,

    /// Main-loop iterations consumed.
    pub iterations: usize,

    /// Main-loop iteration budget.
    pub max_iterations: usize,

    /// Fallback tool calls issued, bounded separately from iterations.
    pub fallback_attempts: u32,
}

impl WorkingMemory {
    pub fn new(max_iterations: usize) -> Self {
        Self {
            thoughts: Vec::new(),
            tool_calls: Vec::new(),
            observations: Vec::new(),
            collected: CollectedData::default(),
            iterations: 0,
            max_iterations,
            fallback_attempts: 0,
        }
    }

    /// Increment the iteration counter. Returns `false` once the budget
    /// is exhausted.
    pub fn tick(&mut self) -> bool {
        self.iterations += 1;
        self.iterations <= self.max_iterations
    }

    /// Record a thought that did not lead to a tool call (LLM-driven
    /// mode: malformed model output).
    pub fn record_thought(&mut self, thought: impl Into<String>) {
        self.thoughts.push(thought.into());
    }

    /// Record one complete decision: thought, tool call, observation.
    /// Success payloads are folded into the collected buckets.
    pub fn record(&mut self, thought: impl Into<String>, call: ToolCall, observation: Observation) {
        self.thoughts.push(thought.into());
        if let Some(payload) = observation.payload() {
            self.collected.absorb(payload);
        }
        self.tool_calls.push(call);
        self.observations.push(observation);
    }

    /// Render the trace as human-readable text.
    pub fn render(&self) -> String {
        let mut out = String::new();

        if !self.thoughts.is_empty() {
            out.push_str("## Thoughts\n");
            for (i, thought) in self.thoughts.iter().enumerate() {
                out.push_str(&format!("{}. {}\n", i + 1, thought));
            }
            out.push('\n');
        }

        if !self.tool_calls.is_empty() {
            out.push_str("## Tool Calls\n");
            for (call, obs) in self.tool_calls.iter().zip(&self.observations) {
                let status = if obs.is_error() { "✗" } else { "✓" };
                out.push_str(&format!(
                    "- {} {}({}) -> {}\n",
                    status,
                    call.tool_name,
                    call.arguments,
                    obs.summary()
                ));
            }
            out.push('\n');
        }

        out.push_str("## Collected Data\n");
        out.push_str(&format!(
            "- competitors: {}\n- funding: {} company(ies)\n- web results: {}\n- retrieval results: {}\n\n",
            self.collected.competitors.len(),
            self.collected.funding.len(),
            self.collected.web_results.len(),
            self.collected.retrieval_results.len(),
        ));

        out.push_str(&format!(
            "Iterations: {}/{} (fallbacks: {})\n",
            self.iterations, self.max_iterations, self.fallback_attempts
        ));

        out
    }
}
