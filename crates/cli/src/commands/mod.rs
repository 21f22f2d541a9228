pub mod survey;
pub mod tools;

use anyhow::Context;
use marketscout_config::{AppConfig, ToolMode};
use marketscout_core::tool::ToolRegistry;
use marketscout_tools::{
    CompetitorFinderTool, FundingRetrieverTool, LiveWebSearchTool, NoOpTool, RagQueryTool,
};
use std::time::Duration;

/// Load the config file. Env overrides and validation happen inside
/// the loader.
pub fn load_config(path: &str) -> anyhow::Result<AppConfig> {
    AppConfig::load_or_default(path).with_context(|| format!("failed to load config from {path}"))
}

/// Build the tool registry the config asks for. Fixture mode is fully
/// offline; live mode swaps in the real web search backend.
pub fn build_registry(config: &AppConfig) -> anyhow::Result<ToolRegistry> {
    let mut registry = match config.tools.mode {
        ToolMode::Fixture => marketscout_tools::fixture_registry(),
        ToolMode::Live => {
            let api_key = config
                .tools
                .search_api_key
                .clone()
                .ok_or_else(|| anyhow::anyhow!("live tool mode requires a search API key"))?;
            let mut registry = ToolRegistry::new();
            registry.register(Box::new(CompetitorFinderTool::fixture()));
            registry.register(Box::new(FundingRetrieverTool::fixture()));
            registry.register(Box::new(LiveWebSearchTool::new(
                &config.tools.search_endpoint,
                api_key,
                config.tools.search_num_results,
            )));
            registry.register(Box::new(RagQueryTool::fixture()));
            registry.register(Box::new(NoOpTool));
            registry
        }
    };
    registry = registry.with_call_timeout(Duration::from_secs(config.dispatch.tool_timeout_secs));
    Ok(registry)
}
