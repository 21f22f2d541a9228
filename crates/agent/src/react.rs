//! LLM-driven dispatch loop.
//!
//! The model is asked to emit plain-text `Thought` / `Action` /
//! `Action Input` lines (or a closing `Final Answer`), which are parsed
//! back out of the response content with marker scanning. No native
//! tool-calling API is used, so this works against any chat-completion
//! backend.
//!
//! The same no-throw contract as the rule-based loop applies: provider
//! faults, unknown actions, and malformed output are all recorded in
//! working memory and the loop moves on. Transient provider errors get
//! one backed-off retry before being recorded.

use crate::working_memory::{RunStatus, WorkingMemory};
use marketscout_config::DispatchConfig;
use marketscout_core::input::ParsedInput;
use marketscout_core::provider::{Message, Provider, ProviderRequest};
use marketscout_core::tool::{ToolCall, ToolRegistry};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

const FINAL_ANSWER_MARKER: &str = "Final Answer:";
const ACTION_MARKER: &str = "Action:";
const ACTION_INPUT_MARKER: &str = "Action Input:";
const THOUGHT_MARKER: &str = "Thought:";

/// What a partial run hands back instead of a model-written answer.
const EXHAUSTED_ANSWER: &str =
    "I was unable to reach a final answer within the iteration budget. \
     The partial findings collected so far are available in the run trace.";

/// The outcome of an LLM-driven run.
#[derive(Debug)]
pub struct ReactOutcome {
    /// The model's final answer, or a canned notice on exhaustion.
    pub answer: String,
    pub memory: WorkingMemory,
    pub status: RunStatus,
}

/// The LLM-driven loop. Holds the provider, the tool registry, and the
/// run limits.
pub struct ReactAgent {
    provider: Arc<dyn Provider>,
    registry: Arc<ToolRegistry>,
    model: String,
    temperature: f32,
    max_iterations: usize,
    retry_backoff: Duration,
}

impl ReactAgent {
    pub fn new(
        provider: Arc<dyn Provider>,
        registry: Arc<ToolRegistry>,
        model: impl Into<String>,
        temperature: f32,
        config: &DispatchConfig,
    ) -> Self {
        Self {
            provider,
            registry,
            model: model.into(),
            temperature,
            max_iterations: config.max_iterations as usize,
            retry_backoff: Duration::from_secs(config.retry_backoff_secs),
        }
    }

    fn system_prompt(&self) -> String {
        let mut catalog = String::new();
        for (name, description) in self.registry.catalog() {
            catalog.push_str(&format!("- {name}: {description}\n"));
        }

        format!(
            "You are a market research assistant. You investigate a startup idea \
             by calling tools, one per turn.\n\n\
             Available tools:\n{catalog}\n\
             Respond in exactly this format:\n\
             Thought: what you want to find out next\n\
             Action: the tool name, exactly as listed\n\
             Action Input: a JSON object of arguments for the tool\n\n\
             When you have gathered competitor, funding, and market data, respond with:\n\
             Final Answer: your complete market analysis"
        )
    }

    fn build_request(&self, input: &ParsedInput, scratchpad: &str) -> ProviderRequest {
        let input_json =
            serde_json::to_string_pretty(input).unwrap_or_else(|_| input.core_idea.clone());

        let mut task = format!("Research this startup idea:\n{input_json}");
        if !scratchpad.is_empty() {
            task.push_str("\n\nWork so far:\n");
            task.push_str(scratchpad);
            task.push_str("\nContinue. Next Thought/Action or Final Answer:");
        }

        ProviderRequest {
            model: self.model.clone(),
            messages: vec![Message::system(self.system_prompt()), Message::user(task)],
            temperature: self.temperature,
            max_tokens: None,
        }
    }

    /// One completion with a single backed-off retry on transient
    /// provider faults.
    async fn complete_with_retry(
        &self,
        request: ProviderRequest,
    ) -> Result<String, marketscout_core::error::ProviderError> {
        match self.provider.complete(request.clone()).await {
            Ok(response) => Ok(response.content),
            Err(err) if err.is_transient() => {
                warn!(
                    error = %err,
                    backoff_secs = self.retry_backoff.as_secs(),
                    "transient provider error, retrying once"
                );
                tokio::time::sleep(self.retry_backoff).await;
                self.provider.complete(request).await.map(|r| r.content)
            }
            Err(err) => Err(err),
        }
    }

    /// Run the loop to completion. Cannot fail: every fault ends up in
    /// the returned memory.
    pub async fn run(&self, input: &ParsedInput) -> ReactOutcome {
        let mut wm = WorkingMemory::new(self.max_iterations);
        let mut scratchpad = String::new();

        info!(
            model = %self.model,
            max_iterations = self.max_iterations,
            "react loop starting"
        );

        let (answer, status) = loop {
            if !wm.tick() {
                warn!(
                    iterations = wm.max_iterations,
                    "iteration budget exhausted without a final answer"
                );
                break (EXHAUSTED_ANSWER.to_string(), RunStatus::Partial);
            }

            let request = self.build_request(input, &scratchpad);
            let content = match self.complete_with_retry(request).await {
                Ok(content) => content,
                Err(err) => {
                    warn!(error = %err, "provider call failed, recording and continuing");
                    let call = ToolCall::no_op();
                    wm.record(
                        format!("Provider call failed: {err}"),
                        call,
                        marketscout_core::observation::Observation::provider_error(
                            err.to_string(),
                        ),
                    );
                    scratchpad.push_str(&format!("Observation: provider error: {err}\n"));
                    continue;
                }
            };

            // A final answer on the very first turn, with zero tool
            // calls, is still a valid complete run.
            if let Some(answer) = extract_final_answer(&content) {
                debug!(iterations = wm.iterations, "model declared a final answer");
                break (answer, RunStatus::Complete);
            }

            let thought =
                extract_thought(&content).unwrap_or_else(|| content.trim().to_string());

            let Some((action, raw_input)) = extract_action(&content) else {
                debug!("model output had no action or final answer, nudging");
                wm.record_thought(&thought);
                scratchpad.push_str(&format!(
                    "Thought: {thought}\n\
                     Observation: response did not follow the Thought/Action format\n"
                ));
                continue;
            };

            let arguments = normalize_action_input(&raw_input);
            let call = ToolCall::new(&action, arguments);
            let observation = self.registry.execute(&call).await;

            scratchpad.push_str(&format!(
                "Thought: {thought}\nAction: {action}\nAction Input: {raw_input}\nObservation: {}\n",
                observation.summary()
            ));
            wm.record(thought, call, observation);
        };

        info!(
            status = ?status,
            iterations = wm.iterations.min(wm.max_iterations),
            tool_calls = wm.tool_calls.len(),
            "react loop finished"
        );

        ReactOutcome {
            answer,
            memory: wm,
            status,
        }
    }
}

/// Everything after the first `Final Answer:` marker, trimmed, or
/// `None` when the marker is absent.
fn extract_final_answer(content: &str) -> Option<String> {
    content
        .find(FINAL_ANSWER_MARKER)
        .map(|idx| content[idx + FINAL_ANSWER_MARKER.len()..].trim().to_string())
}

/// The first `Thought:` line's remainder.
fn extract_thought(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        line.trim()
            .strip_prefix(THOUGHT_MARKER)
            .map(|rest| rest.trim().to_string())
    })
}

/// The first `Action:` and `Action Input:` pair, scanned line by line
/// so `Action:` never matches inside `Action Input:`.
fn extract_action(content: &str) -> Option<(String, String)> {
    let mut action = None;
    let mut action_input = None;

    for line in content.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix(ACTION_INPUT_MARKER) {
            if action_input.is_none() {
                action_input = Some(rest.trim().to_string());
            }
        } else if let Some(rest) = line.strip_prefix(ACTION_MARKER)
            && action.is_none()
        {
            action = Some(rest.trim().to_string());
        }
    }

    match (action, action_input) {
        (Some(a), Some(i)) if !a.is_empty() => Some((a, i)),
        (Some(a), None) if !a.is_empty() => Some((a, String::new())),
        _ => None,
    }
}

/// Coerce the raw action input into a JSON object of tool arguments.
/// Valid JSON objects pass through; a bare JSON string or unparseable
/// text is wrapped as a query argument.
fn normalize_action_input(raw: &str) -> serde_json::Value {
    match serde_json::from_str::<serde_json::Value>(raw.trim()) {
        Ok(value @ serde_json::Value::Object(_)) => value,
        Ok(serde_json::Value::String(s)) => serde_json::json!({ "query": s }),
        _ => serde_json::json!({ "query": raw.trim() }),
    }
}
