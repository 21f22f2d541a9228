//! The dispatch loop — the heart of MarketScout.
//!
//! Given a parsed startup idea and a tool registry, the loop repeatedly
//! decides which evidence gap to close next, invokes the matching tool,
//! folds the observation into working memory, and stops once the
//! coverage predicate is satisfied or the iteration budget runs out.
//!
//! Two operating modes share the same working-memory model and bounded
//! termination semantics:
//!
//! 1. [`SurveyAgent`] — deterministic, rule-based gap detection in a
//!    fixed priority order (competitors → funding → web → retrieval)
//! 2. [`ReactAgent`] — an LLM decides the next action via a plain-text
//!    Thought / Action / Action Input protocol
//!
//! Neither mode ever raises: every tool and provider fault is recorded
//! as an error observation and the run terminates normally, possibly
//! with partially empty categories.

pub mod dispatch;
pub mod input_parser;
pub mod react;
pub mod report;
pub mod working_memory;

pub use dispatch::{SurveyAgent, SurveyOutcome};
pub use input_parser::parse_idea;
pub use react::{ReactAgent, ReactOutcome};
pub use report::render_report;
pub use working_memory::{CollectedData, RunStatus, WorkingMemory};

#[cfg(test)]
pub(crate) mod test_helpers;
