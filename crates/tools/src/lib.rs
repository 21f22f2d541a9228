//! Research tool implementations for MarketScout.
//!
//! Tools are the agent's evidence sources: competitor lookup, funding
//! lookup, web search, and semantic retrieval, plus the `no_op`
//! sentinel. Data-backed tools take their datasets by injection; each
//! ships a `fixture()` constructor with a small deterministic dataset so
//! the whole pipeline runs offline, and web search has a live
//! `reqwest`-backed variant selected by configuration at wiring time.

pub mod competitor_finder;
pub mod funding_retriever;
pub mod no_op;
pub mod rag_query;
pub mod web_search;

pub use competitor_finder::{CompetitorFinderTool, StartupProfile};
pub use funding_retriever::{FundingEvent, FundingRetrieverTool};
pub use no_op::NoOpTool;
pub use rag_query::RagQueryTool;
pub use web_search::{FixtureWebSearchTool, LiveWebSearchTool};

use marketscout_core::tool::ToolRegistry;

/// Create a registry with all tools in deterministic fixture mode.
pub fn fixture_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(CompetitorFinderTool::fixture()));
    registry.register(Box::new(FundingRetrieverTool::fixture()));
    registry.register(Box::new(FixtureWebSearchTool::new()));
    registry.register(Box::new(RagQueryTool::fixture()));
    registry.register(Box::new(NoOpTool));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_registry_has_all_tools() {
        let registry = fixture_registry();
        for name in [
            "competitor_finder",
            "funding_retriever",
            "web_search",
            "rag_query",
            "no_op",
        ] {
            assert!(registry.contains(name), "missing tool {name}");
        }
    }
}
