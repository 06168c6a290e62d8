//! Orchestrator request and response types

use crate::providers::{DetailLevel, ProviderKind, SummaryLength, TextAnalysis};
use crate::rate_limiter::RateLimitStatus;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Which unified operation a request is for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Operation {
    Explain,
    Summarize,
}

impl Operation {
    /// Cache key namespace
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Explain => "explain",
            Self::Summarize => "summarize",
        }
    }
}

/// Options for [`Orchestrator::explain`](super::Orchestrator::explain)
#[derive(Debug, Clone, Default)]
pub struct ExplainOptions {
    /// Requested explanation depth
    pub level: DetailLevel,
    /// Provider promoted to the front of the chain for this call
    pub preferred_provider: Option<ProviderKind>,
    /// Bypass the cache lookup (the fresh result is still cached)
    pub skip_cache: bool,
}

/// Options for [`Orchestrator::summarize`](super::Orchestrator::summarize)
#[derive(Debug, Clone, Default)]
pub struct SummarizeOptions {
    /// Requested summary length
    pub length: SummaryLength,
    /// Provider promoted to the front of the chain for this call
    pub preferred_provider: Option<ProviderKind>,
    /// Bypass the cache lookup (the fresh result is still cached)
    pub skip_cache: bool,
}

/// A finished explanation
#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    /// The explanation text
    pub explanation: String,
    /// Name of the provider that served the request
    pub provider: String,
    /// Detail level the explanation was produced at
    pub level: DetailLevel,
    /// When the explanation was produced
    pub timestamp: DateTime<Utc>,
    /// Model that produced it, where known
    pub model: Option<String>,
    /// Backend-reported token usage, where known
    pub tokens_used: Option<u32>,
    /// Text statistics, present only when the local heuristic served the call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<TextAnalysis>,
}

/// A finished summary
#[derive(Debug, Clone, Serialize)]
pub struct Summary {
    /// The summary text
    pub summary: String,
    /// Name of the provider that served the request
    pub provider: String,
    /// Character count of the input text
    pub original_length: usize,
    /// Character count of the summary
    pub summary_length: usize,
    /// When the summary was produced
    pub timestamp: DateTime<Utc>,
}

/// What the response cache holds
#[derive(Debug, Clone)]
pub(super) enum CachedResponse {
    Explanation(Explanation),
    Summary(Summary),
}

/// Read-only view of one provider's health
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    /// Provider name
    pub name: String,
    /// Whether `initialize` succeeded with a usable credential
    pub initialized: bool,
    /// Whether the provider is usable this session
    pub available: bool,
    /// Consecutive failures since the last success
    pub error_count: u32,
    /// Most recent failure message
    pub last_error: Option<String>,
    /// Remaining cool-down, if the provider is temporarily disabled
    pub disabled_for_ms: Option<u64>,
}

/// Read-only snapshot of the orchestrator
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    /// Per-provider health, in registration order
    pub providers: Vec<ProviderStatus>,
    /// Entries currently held by the response cache
    pub cache_entries: usize,
    /// Persisted preferred provider, if any
    pub preferred_provider: Option<String>,
}

/// Outcome of one provider's rate limit probe
///
/// Exactly one of `status` and `error` is set; a failing client never
/// suppresses the other entries in the fan-out.
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitReport {
    /// The provider's admission status, when the probe succeeded
    pub status: Option<RateLimitStatus>,
    /// The probe failure, when it did not
    pub error: Option<String>,
}
