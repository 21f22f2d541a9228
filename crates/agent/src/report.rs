//! Report synthesizer. Consumes a frozen [`WorkingMemory`] by
//! reference and renders a Markdown market survey. Never touches tools
//! or providers, and never mutates the memory it reads.
//!
//! Every section degrades to explicit "no data" prose, so a partial
//! run still yields a well-formed report.

use crate::working_memory::{RunStatus, WorkingMemory};
use marketscout_core::input::ParsedInput;
use std::fmt::Write;

/// Render the survey report from a finished run.
pub fn render_report(input: &ParsedInput, memory: &WorkingMemory, status: RunStatus) -> String {
    let mut out = String::new();
    let collected = &memory.collected;

    let _ = writeln!(out, "# Market Survey: {}\n", input.core_idea);

    // Executive summary
    out.push_str("## Executive Summary\n\n");
    let _ = writeln!(
        out,
        "Domain: **{}**. Competitors found: **{}**. Companies with funding data: **{}**.",
        input.domain_or_default(),
        collected.competitors.len(),
        collected.funding.len(),
    );
    if !input.target_audience.is_empty() {
        let _ = writeln!(out, "Target audience: {}.", input.target_audience);
    }
    if status == RunStatus::Partial {
        out.push_str(
            "\n*This survey is partial: the research loop stopped before all data was collected.*\n",
        );
    }
    out.push('\n');

    // Competitor landscape
    out.push_str("## Competitor Landscape\n\n");
    if collected.competitors.is_empty() {
        out.push_str("No competitor data found for this idea.\n\n");
    } else {
        for competitor in &collected.competitors {
            let _ = writeln!(
                out,
                "- **{}** ({}) — {} (similarity {:.2})",
                competitor.name, competitor.industry, competitor.description, competitor.similarity,
            );
        }
        out.push('\n');
    }

    // Funding analysis
    out.push_str("## Funding Analysis\n\n");
    if collected.funding.is_empty() {
        out.push_str("No funding data found for the identified competitors.\n\n");
    } else {
        for (company, rounds) in &collected.funding {
            let total: u64 = rounds.iter().map(|r| r.amount_usd).sum();
            let _ = writeln!(out, "### {company}");
            for round in rounds {
                let _ = writeln!(
                    out,
                    "- {}: ${:.1}M ({})",
                    round.round,
                    round.amount_usd as f64 / 1_000_000.0,
                    round.date,
                );
            }
            let _ = writeln!(out, "- Total raised: ${:.1}M\n", total as f64 / 1_000_000.0);
        }
    }

    // Market trends, from web search and/or retrieval
    out.push_str("## Market Trends\n\n");
    if collected.web_results.is_empty() && collected.retrieval_results.is_empty() {
        out.push_str("No market trend data found.\n\n");
    } else {
        for result in &collected.web_results {
            let _ = writeln!(out, "- [{}]({}): {}", result.title, result.url, result.snippet);
        }
        for hit in &collected.retrieval_results {
            let _ = writeln!(out, "- {} *(source: {}, score {:.2})*", hit.content, hit.source, hit.score);
        }
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "---\n*{} iterations, {} tool calls, {} fallback attempt(s).*",
        memory.iterations.min(memory.max_iterations),
        memory.tool_calls.len(),
        memory.fallback_attempts,
    );

    out
}
