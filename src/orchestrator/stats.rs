//! Usage statistics

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// Most recent errors retained for diagnostics
const RECENT_ERROR_CAPACITY: usize = 10;

/// One retained provider failure
#[derive(Debug, Clone, Serialize)]
pub struct ErrorRecord {
    /// Provider that failed
    pub provider: String,
    /// Failure description
    pub message: String,
    /// When the failure was recorded
    pub timestamp: DateTime<Utc>,
}

/// Aggregated orchestrator usage
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsageStats {
    /// Orchestrated calls accepted for processing (cache hits included)
    pub total_requests: u64,
    /// Calls served by a provider (cache hits excluded)
    pub successful_requests: u64,
    /// Non-cached successes per provider
    pub provider_usage: HashMap<String, u64>,
    /// Running mean latency over provider successes, in milliseconds
    pub average_response_time_ms: f64,
    /// Bounded ring of recent provider failures, oldest first
    pub recent_errors: VecDeque<ErrorRecord>,
}

impl UsageStats {
    /// Count one accepted request
    pub(super) fn record_request(&mut self) {
        self.total_requests += 1;
    }

    /// Count one provider success and fold its latency into the mean
    pub(super) fn record_success(&mut self, provider: &str, elapsed_ms: f64) {
        self.successful_requests += 1;
        *self.provider_usage.entry(provider.to_string()).or_insert(0) += 1;
        let n = self.successful_requests as f64;
        self.average_response_time_ms += (elapsed_ms - self.average_response_time_ms) / n;
    }

    /// Retain a provider failure, evicting the oldest past capacity
    pub(super) fn record_error(&mut self, provider: &str, message: String) {
        self.recent_errors.push_back(ErrorRecord {
            provider: provider.to_string(),
            message,
            timestamp: Utc::now(),
        });
        while self.recent_errors.len() > RECENT_ERROR_CAPACITY {
            self.recent_errors.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_mean_matches_arithmetic_mean() {
        let mut stats = UsageStats::default();
        let durations = [12.0, 48.0, 30.0, 10.0];
        for d in durations {
            stats.record_success("openai", d);
        }

        let expected: f64 = durations.iter().sum::<f64>() / durations.len() as f64;
        assert!((stats.average_response_time_ms - expected).abs() < 1e-9);
        assert_eq!(stats.successful_requests, 4);
        assert_eq!(stats.provider_usage["openai"], 4);
    }

    #[test]
    fn usage_is_tracked_per_provider() {
        let mut stats = UsageStats::default();
        stats.record_success("openai", 10.0);
        stats.record_success("claude", 20.0);
        stats.record_success("claude", 30.0);

        assert_eq!(stats.provider_usage["openai"], 1);
        assert_eq!(stats.provider_usage["claude"], 2);
    }

    #[test]
    fn recent_errors_ring_is_bounded() {
        let mut stats = UsageStats::default();
        for n in 0..15 {
            stats.record_error("openai", format!("error {n}"));
        }

        assert_eq!(stats.recent_errors.len(), RECENT_ERROR_CAPACITY);
        // Oldest entries were evicted first.
        assert_eq!(stats.recent_errors.front().unwrap().message, "error 5");
        assert_eq!(stats.recent_errors.back().unwrap().message, "error 14");
    }
}
