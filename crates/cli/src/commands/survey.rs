//! `marketscout survey` — run one market survey end to end.

use anyhow::Context;
use clap::{Args, ValueEnum};
use marketscout_agent::{parse_idea, render_report, ReactAgent, RunStatus, SurveyAgent};
use marketscout_core::input::ParsedInput;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Args)]
pub struct SurveyArgs {
    /// The startup idea to research, as free text
    #[arg(short, long, conflicts_with = "input_file")]
    idea: Option<String>,

    /// Read the idea from a file instead (plain text, or JSON with a
    /// .json extension for pre-parsed input)
    #[arg(long)]
    input_file: Option<PathBuf>,

    /// Dispatch mode
    #[arg(long, value_enum, default_value_t = Mode::Rule)]
    mode: Mode,

    /// Config file path
    #[arg(short, long, default_value = "marketscout.toml")]
    config: String,

    /// Write the report to a file instead of stdout
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print the full run trace after the report
    #[arg(long)]
    show_trace: bool,

    /// Write the run trace as JSON to a file
    #[arg(long)]
    trace_out: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Deterministic gap-driven dispatch, no model required
    Rule,
    /// LLM-driven dispatch via the Thought/Action protocol
    React,
}

fn resolve_input(args: &SurveyArgs) -> anyhow::Result<ParsedInput> {
    if let Some(idea) = &args.idea {
        return Ok(parse_idea(idea));
    }
    let Some(path) = &args.input_file else {
        anyhow::bail!("either --idea or --input-file is required");
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&text).with_context(|| format!("invalid input JSON in {}", path.display()))
    } else {
        Ok(parse_idea(&text))
    }
}

pub async fn run(args: SurveyArgs) -> anyhow::Result<()> {
    let config = super::load_config(&args.config)?;
    let input = resolve_input(&args)?;
    let registry = Arc::new(super::build_registry(&config)?);

    let mode_name = match args.mode {
        Mode::Rule => "rule",
        Mode::React => "react",
    };
    info!(idea = %input.core_idea, mode = mode_name, "starting survey");

    let (memory, status, answer) = match args.mode {
        Mode::Rule => {
            let agent = SurveyAgent::new(registry, config.dispatch);
            let outcome = agent.run(&input).await;
            (outcome.memory, outcome.status, None)
        }
        Mode::React => {
            let provider = marketscout_providers::from_config(&config.provider)?;
            let agent = ReactAgent::new(
                provider,
                registry,
                &config.provider.model,
                config.provider.temperature,
                &config.dispatch,
            );
            let outcome = agent.run(&input).await;
            (outcome.memory, outcome.status, Some(outcome.answer))
        }
    };

    let mut report = render_report(&input, &memory, status);
    if let Some(answer) = answer {
        report.push_str("\n## Model Analysis\n\n");
        report.push_str(&answer);
        report.push('\n');
    }

    match &args.report {
        Some(path) => {
            std::fs::write(path, &report)
                .with_context(|| format!("failed to write report to {}", path.display()))?;
            println!("Report written to {}", path.display());
        }
        None => println!("{report}"),
    }

    if args.show_trace {
        println!("\n{}", memory.render());
    }
    if let Some(path) = &args.trace_out {
        let json = serde_json::to_string_pretty(&memory)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write trace to {}", path.display()))?;
    }

    if status == RunStatus::Partial {
        info!("survey finished with partial data");
    }
    Ok(())
}
