//! Rate limiter configuration, persisted state, and status types

use crate::config::Tier;
use serde::{Deserialize, Serialize};

/// Configuration for a sliding-window rate limiter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimiterConfig {
    /// Identifier the state is persisted under (one per backend+tier)
    pub identifier: String,
    /// Maximum admissions inside one window
    pub capacity: u32,
    /// Window length in milliseconds
    pub window_ms: u64,
}

impl RateLimiterConfig {
    /// Create a config with an explicit capacity and window
    pub fn new(identifier: impl Into<String>, capacity: u32, window_ms: u64) -> Self {
        Self {
            identifier: identifier.into(),
            capacity,
            window_ms,
        }
    }

    /// Per-minute budget for the OpenAI-compatible backend at the given tier
    pub fn for_openai(tier: Tier) -> Self {
        Self::new("openai", tier.requests_per_minute(), 60_000)
    }

    /// Hourly budget for the Claude backend
    pub fn for_claude() -> Self {
        Self::new("claude", 100, 3_600_000)
    }
}

/// Persisted limiter state, stored under `ratelimit:{identifier}`
///
/// Timestamps are wall-clock epoch milliseconds so the rolling window is
/// still meaningful after a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(super) struct PersistedState {
    pub identifier: String,
    pub capacity: u32,
    pub window_ms: u64,
    pub request_timestamps: Vec<i64>,
}

/// Point-in-time admission status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitStatus {
    /// Admissions left in the current window
    pub remaining: u32,
    /// Window length in milliseconds
    pub window_ms: u64,
    /// Admissions recorded inside the current window
    pub requests_in_window: u32,
    /// Milliseconds until the earliest recorded admission leaves the window;
    /// zero when the window is empty
    pub reset_in_ms: u64,
}
