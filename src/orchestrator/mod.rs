//! Request orchestration across the provider fallback chain
//!
//! The orchestrator owns the registered providers, their health state, the
//! response cache, and usage statistics. Requests walk an ordered provider
//! chain sequentially; the first success wins, failures push the chain
//! forward, and the deterministic local heuristic at the end guarantees an
//! answer for any valid input.

mod chain;
mod health;
#[allow(clippy::module_inception)]
mod orchestrator;
mod stats;
mod types;


pub use orchestrator::Orchestrator;
pub use stats::{ErrorRecord, UsageStats};
pub use types::{
    ExplainOptions, Explanation, ProviderStatus, RateLimitReport, StatusSnapshot,
    SummarizeOptions, Summary,
};

// Convenience re-exports so orchestrator callers rarely need the providers module
pub use crate::providers::{DetailLevel, SummaryLength, TextAnalysis, TextType};
