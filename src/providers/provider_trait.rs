//! Provider capability trait and unified enum

use super::types::{DetailLevel, ProviderExplanation, ProviderSummary, SummaryLength};
use crate::error::GlossaResult;
use crate::rate_limiter::RateLimitStatus;
use async_trait::async_trait;

/// Uniform capability over one explanation backend
///
/// Implementations shape prompts and parse wire formats their own way, but
/// must honor the same semantic contract, so the orchestrator can substitute
/// any provider for any other mid-chain.
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Stable provider name used in results, statistics, and logs
    fn name(&self) -> &'static str;

    /// Load the credential; `Ok(false)` means the backend is unusable
    /// (missing key) without that being a startup error
    async fn initialize(&self) -> GlossaResult<bool>;

    /// Explain the text at the requested detail level
    async fn explain(&self, text: &str, level: DetailLevel) -> GlossaResult<ProviderExplanation>;

    /// Summarize the text toward the requested length
    async fn summarize(&self, text: &str, length: SummaryLength)
    -> GlossaResult<ProviderSummary>;

    /// Consume one unit of this client's own admission budget
    async fn admit(&self) -> GlossaResult<bool>;

    /// Current admission status of this client's limiter
    async fn rate_limit_status(&self) -> GlossaResult<RateLimitStatus>;
}

/// Unified provider enum wrapping every client implementation
///
/// A closed set rather than trait objects in a dynamic registry: fallback
/// chain construction can be checked for exhaustiveness at compile time.
#[derive(Debug)]
pub enum ProviderInstance {
    /// Chat-completions style backend
    OpenAi(super::openai::OpenAiProvider),
    /// Messages style backend
    Claude(super::claude::ClaudeProvider),
    /// Deterministic local heuristic
    Local(super::local::LocalProvider),
    #[cfg(test)]
    Mock(super::mock::MockProvider),
}

#[async_trait]
impl TextProvider for ProviderInstance {
    fn name(&self) -> &'static str {
        match self {
            Self::OpenAi(p) => p.name(),
            Self::Claude(p) => p.name(),
            Self::Local(p) => p.name(),
            #[cfg(test)]
            Self::Mock(p) => p.name(),
        }
    }

    async fn initialize(&self) -> GlossaResult<bool> {
        match self {
            Self::OpenAi(p) => p.initialize().await,
            Self::Claude(p) => p.initialize().await,
            Self::Local(p) => p.initialize().await,
            #[cfg(test)]
            Self::Mock(p) => p.initialize().await,
        }
    }

    async fn explain(&self, text: &str, level: DetailLevel) -> GlossaResult<ProviderExplanation> {
        match self {
            Self::OpenAi(p) => p.explain(text, level).await,
            Self::Claude(p) => p.explain(text, level).await,
            Self::Local(p) => p.explain(text, level).await,
            #[cfg(test)]
            Self::Mock(p) => p.explain(text, level).await,
        }
    }

    async fn summarize(
        &self,
        text: &str,
        length: SummaryLength,
    ) -> GlossaResult<ProviderSummary> {
        match self {
            Self::OpenAi(p) => p.summarize(text, length).await,
            Self::Claude(p) => p.summarize(text, length).await,
            Self::Local(p) => p.summarize(text, length).await,
            #[cfg(test)]
            Self::Mock(p) => p.summarize(text, length).await,
        }
    }

    async fn admit(&self) -> GlossaResult<bool> {
        match self {
            Self::OpenAi(p) => p.admit().await,
            Self::Claude(p) => p.admit().await,
            Self::Local(p) => p.admit().await,
            #[cfg(test)]
            Self::Mock(p) => p.admit().await,
        }
    }

    async fn rate_limit_status(&self) -> GlossaResult<RateLimitStatus> {
        match self {
            Self::OpenAi(p) => p.rate_limit_status().await,
            Self::Claude(p) => p.rate_limit_status().await,
            Self::Local(p) => p.rate_limit_status().await,
            #[cfg(test)]
            Self::Mock(p) => p.rate_limit_status().await,
        }
    }
}
