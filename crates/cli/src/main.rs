//! MarketScout CLI — the main entry point.
//!
//! Commands:
//! - `survey` — run a market survey for a startup idea
//! - `tools`  — list the registered research tools

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "marketscout",
    about = "MarketScout — automated market surveys for startup ideas",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Research a startup idea and produce a survey report
    Survey(commands::survey::SurveyArgs),

    /// List the registered research tools
    Tools {
        /// Config file to read the tool mode from
        #[arg(short, long, default_value = "marketscout.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Survey(args) => commands::survey::run(args).await,
        Commands::Tools { config } => commands::tools::run(&config),
    }
}
