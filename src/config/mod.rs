//! Provider configuration and persisted settings keys

use serde::{Deserialize, Serialize};

/// Store keys consumed by the engine
pub mod keys {
    /// OpenAI-compatible backend credential
    pub const OPENAI_API_KEY: &str = "openai_api_key";
    /// Claude backend credential
    pub const CLAUDE_API_KEY: &str = "claude_api_key";
    /// OpenAI rate tier setting (`"free"`, `"tier1"`, `"tier2"`)
    pub const OPENAI_TIER: &str = "openai_tier";
    /// Preferred provider flag
    pub const PREFERRED_PROVIDER: &str = "preferred_provider";
    /// Prefix for persisted rate limiter state, followed by the identifier
    pub const RATE_LIMIT_PREFIX: &str = "ratelimit:";
}

/// Rate tier for the OpenAI-compatible backend
///
/// Request budgets scale with the account tier; the tier is read from the
/// persisted store at client initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Free tier
    #[default]
    Free,
    /// First paid tier
    Tier1,
    /// Second paid tier
    Tier2,
}

impl Tier {
    /// Requests allowed per minute at this tier
    pub fn requests_per_minute(&self) -> u32 {
        match self {
            Self::Free => 60,
            Self::Tier1 => 500,
            Self::Tier2 => 4_000,
        }
    }

    /// Parse a stored tier value, falling back to the free tier
    pub fn from_setting(value: Option<&str>) -> Self {
        match value {
            Some("tier1") => Self::Tier1,
            Some("tier2") => Self::Tier2,
            _ => Self::Free,
        }
    }
}

/// Configuration for a remote provider client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key for authentication
    pub api_key: Option<String>,
    /// API endpoint base URL (overrides the provider default)
    pub base_url: Option<String>,
    /// Model identifier to request
    pub model: String,
    /// API version header value, where the backend requires one
    pub api_version: Option<String>,
    /// Upper bound on generated tokens per request
    pub max_tokens: u32,
}

impl ProviderConfig {
    /// Create a config for the given model with defaults otherwise
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: model.into(),
            api_version: None,
            max_tokens: 1_024,
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the API version header value
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Set the generated-token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Resolved base URL, falling back to the given provider default
    pub fn base_url_or(&self, default: &str) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| default.to_string())
    }

    /// Display-safe masked form of the API key
    pub fn masked_key(&self) -> Option<String> {
        self.api_key.as_ref().map(|k| mask_api_key(k))
    }
}

/// Mask an API key for logs and status displays
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", prefix, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_budgets_scale() {
        assert_eq!(Tier::Free.requests_per_minute(), 60);
        assert_eq!(Tier::Tier1.requests_per_minute(), 500);
        assert_eq!(Tier::Tier2.requests_per_minute(), 4_000);
    }

    #[test]
    fn tier_parses_stored_setting() {
        assert_eq!(Tier::from_setting(Some("tier2")), Tier::Tier2);
        assert_eq!(Tier::from_setting(Some("bogus")), Tier::Free);
        assert_eq!(Tier::from_setting(None), Tier::Free);
    }

    #[test]
    fn masked_key_hides_middle() {
        let masked = mask_api_key("sk-abcdefghijklmnop");
        assert!(masked.starts_with("sk-a"));
        assert!(masked.ends_with("mnop"));
        assert!(!masked.contains("efghijkl"));

        assert_eq!(mask_api_key("short"), "*****");
    }
}
