//! # MarketScout Core
//!
//! Domain types, traits, and error definitions for the MarketScout
//! market-intelligence research agent. This crate defines the contracts
//! that all other crates implement against:
//!
//! - [`ParsedInput`] — the structured form of a startup idea
//! - [`Tool`] / [`ToolRegistry`] — read-only research capabilities
//! - [`Observation`] — the recorded result of one tool invocation
//! - [`Provider`] — the LLM backend used by the LLM-driven loop variant
//!
//! Every subsystem is defined as a trait here; implementations live in
//! their respective crates, which keeps the dependency graph pointing
//! inward and makes the dispatch loop testable with scripted stand-ins.

pub mod error;
pub mod input;
pub mod observation;
pub mod provider;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, ToolError};
pub use input::ParsedInput;
pub use observation::{
    Category, CompetitorRecord, FundingMap, FundingRound, Observation, ObservationErrorKind,
    Payload, RetrievalHit, WebResult,
};
pub use provider::{Message, Provider, ProviderRequest, ProviderResponse, Role, Usage};
pub use tool::{NO_OP, Tool, ToolCall, ToolRegistry};
