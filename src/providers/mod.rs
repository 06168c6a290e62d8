//! Provider clients for remote backends and the local fallback
//!
//! Each client wraps one backend behind the same capability surface:
//! initialize from the persisted store, explain, summarize, and report
//! admission status. Backends differ in prompt shaping and wire format but
//! honor one semantic contract, so the orchestrator can substitute any for
//! any other.

pub mod claude;
mod error_utils;
pub mod local;
pub mod openai;
mod prompts;
mod provider_trait;
mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use claude::ClaudeProvider;
pub use local::LocalProvider;
pub use openai::OpenAiProvider;
pub use provider_trait::{ProviderInstance, TextProvider};
pub use types::{
    DetailLevel, ProviderExplanation, ProviderSummary, SummaryLength, TextAnalysis, TextType,
};

use serde::{Deserialize, Serialize};

/// The closed set of registered providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Chat-completions style backend
    OpenAi,
    /// Messages style backend
    Claude,
    /// Deterministic local heuristic
    Local,
}

impl ProviderKind {
    /// Every registered provider
    pub const ALL: [ProviderKind; 3] = [Self::OpenAi, Self::Claude, Self::Local];

    /// Stable name used in results, settings, and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Claude => "claude",
            Self::Local => "local",
        }
    }

    /// Parse a stored or caller-supplied provider name
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "claude" => Some(Self::Claude),
            "local" => Some(Self::Local),
            _ => None,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_kind() {
        for kind in ProviderKind::ALL {
            assert_eq!(ProviderKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ProviderKind::parse("OpenAI"), Some(ProviderKind::OpenAi));
        assert_eq!(ProviderKind::parse("bogus"), None);
    }
}
