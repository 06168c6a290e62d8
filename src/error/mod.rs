//! Error types for the Glossa engine
//!
//! Provider failures carry a typed [`ProviderErrorKind`] so the orchestrator
//! branches on a tag rather than on backend-specific error wording.

use thiserror::Error;

/// Result type alias for Glossa operations
pub type GlossaResult<T> = Result<T, GlossaError>;

/// Classification of a normalized provider failure
///
/// Every remote backend reports errors in its own shape; provider clients
/// translate them into one of these kinds before the error leaves the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderErrorKind {
    /// Bad or missing credential; the provider cannot be used until re-init
    Auth,
    /// Backend-reported quota or request-rate exhaustion
    RateLimit,
    /// Server-side or network trouble that may clear on its own
    Transient,
    /// Any other rejected request
    Request,
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auth => write!(f, "auth"),
            Self::RateLimit => write!(f, "rate limit"),
            Self::Transient => write!(f, "transient"),
            Self::Request => write!(f, "request"),
        }
    }
}

/// Main error type for the Glossa engine
#[derive(Error, Debug, Clone)]
pub enum GlossaError {
    /// Caller-supplied input was rejected before any provider was tried
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// A provider client failed; `kind` drives the orchestrator's reaction
    #[error("Provider error ({provider}, {kind}): {message}")]
    Provider {
        provider: String,
        kind: ProviderErrorKind,
        message: String,
    },

    /// Persisted key-value store access failed
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        key: Option<String>,
    },

    /// Serialization or deserialization failed
    #[error("JSON error: {message}")]
    Json { message: String },
}

impl GlossaError {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a provider error with the given classification
    pub fn provider(
        provider: impl Into<String>,
        kind: ProviderErrorKind,
        message: impl Into<String>,
    ) -> Self {
        Self::Provider {
            provider: provider.into(),
            kind,
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            key: None,
        }
    }

    /// Create a storage error tied to a specific key
    pub fn storage_key(message: impl Into<String>, key: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            key: Some(key.into()),
        }
    }

    /// Create a JSON error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json {
            message: message.into(),
        }
    }

    /// The provider error classification, if this is a provider error
    pub fn provider_kind(&self) -> Option<ProviderErrorKind> {
        match self {
            Self::Provider { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Whether this error is a backend-reported quota or rate limit
    pub fn is_rate_limit(&self) -> bool {
        self.provider_kind() == Some(ProviderErrorKind::RateLimit)
    }
}

impl From<serde_json::Error> for GlossaError {
    fn from(err: serde_json::Error) -> Self {
        Self::json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_accessor() {
        let err = GlossaError::provider("openai", ProviderErrorKind::RateLimit, "429");
        assert_eq!(err.provider_kind(), Some(ProviderErrorKind::RateLimit));
        assert!(err.is_rate_limit());

        let err = GlossaError::invalid_input("empty");
        assert_eq!(err.provider_kind(), None);
        assert!(!err.is_rate_limit());
    }

    #[test]
    fn display_includes_provider_and_kind() {
        let err = GlossaError::provider("claude", ProviderErrorKind::Auth, "bad key");
        let text = err.to_string();
        assert!(text.contains("claude"));
        assert!(text.contains("auth"));
    }
}
