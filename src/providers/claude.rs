//! Claude provider client (messages wire format)

use super::error_utils;
use super::prompts;
use super::provider_trait::TextProvider;
use super::types::{DetailLevel, ProviderExplanation, ProviderSummary, SummaryLength};
use crate::config::{ProviderConfig, keys};
use crate::error::{GlossaError, GlossaResult, ProviderErrorKind};
use crate::rate_limiter::{RateLimitStatus, RateLimiterConfig, SlidingWindowLimiter};
use crate::storage::KvStore;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

const NAME: &str = "claude";
const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_API_VERSION: &str = "2023-06-01";

/// Default model for explanation requests
pub const DEFAULT_MODEL: &str = "claude-3-5-haiku-latest";

/// Claude provider handler
#[derive(Debug)]
pub struct ClaudeProvider {
    config: ProviderConfig,
    store: Arc<dyn KvStore>,
    http_client: Client,
    limiter: SlidingWindowLimiter,
    api_key: RwLock<Option<String>>,
}

impl ClaudeProvider {
    /// Create a client with the fixed hourly admission budget
    pub async fn connect(
        store: Arc<dyn KvStore>,
        config: ProviderConfig,
        http_client: Client,
    ) -> GlossaResult<Self> {
        let limiter =
            SlidingWindowLimiter::load(store.clone(), RateLimiterConfig::for_claude()).await?;
        Ok(Self {
            config,
            store,
            http_client,
            limiter,
            api_key: RwLock::new(None),
        })
    }

    /// Send one messages request and extract `(content, tokens, model)`
    async fn chat(&self, system: &str, user: String) -> GlossaResult<(String, Option<u32>, String)> {
        let api_key = self.api_key.read().await.clone().ok_or_else(|| {
            GlossaError::provider(NAME, ProviderErrorKind::Auth, "no credential loaded")
        })?;

        let url = format!("{}/v1/messages", self.config.base_url_or(DEFAULT_BASE_URL));
        let request_body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "system": system,
            "messages": [
                {"role": "user", "content": user},
            ],
        });

        let api_version = self
            .config
            .api_version
            .as_deref()
            .unwrap_or(DEFAULT_API_VERSION);

        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", &api_key)
            .header("anthropic-version", api_version)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| error_utils::transport_error(e, NAME))?;

        if !response.status().is_success() {
            return Err(error_utils::handle_http_error(response, NAME).await);
        }

        let parsed: Value = response
            .json()
            .await
            .map_err(|e| error_utils::parse_error(e, NAME))?;

        let content = parsed["content"][0]["text"]
            .as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| error_utils::missing_field_error(NAME, "content[0].text"))?;

        // Claude reports usage split across input and output.
        let tokens_used = match (
            parsed["usage"]["input_tokens"].as_u64(),
            parsed["usage"]["output_tokens"].as_u64(),
        ) {
            (Some(input), Some(output)) => Some((input + output) as u32),
            _ => None,
        };
        let model = parsed["model"]
            .as_str()
            .unwrap_or(&self.config.model)
            .to_string();

        Ok((content, tokens_used, model))
    }
}

#[async_trait]
impl TextProvider for ClaudeProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn initialize(&self) -> GlossaResult<bool> {
        let key = match &self.config.api_key {
            Some(explicit) => Some(explicit.clone()),
            None => self
                .store
                .get(keys::CLAUDE_API_KEY)
                .await?
                .and_then(|v| v.as_str().map(str::to_string)),
        };

        match key {
            Some(key) if !key.trim().is_empty() => {
                info!(model = %self.config.model, "Claude client initialized");
                *self.api_key.write().await = Some(key);
                Ok(true)
            }
            _ => {
                debug!("no Claude credential configured");
                Ok(false)
            }
        }
    }

    async fn explain(&self, text: &str, level: DetailLevel) -> GlossaResult<ProviderExplanation> {
        let (explanation, tokens_used, model) = self
            .chat(
                prompts::EXPLAIN_SYSTEM,
                prompts::explain_user_message(text, level),
            )
            .await?;
        Ok(ProviderExplanation {
            explanation,
            tokens_used,
            model,
        })
    }

    async fn summarize(
        &self,
        text: &str,
        length: SummaryLength,
    ) -> GlossaResult<ProviderSummary> {
        let (summary, tokens_used, _model) = self
            .chat(
                prompts::SUMMARIZE_SYSTEM,
                prompts::summarize_user_message(text, length),
            )
            .await?;
        Ok(ProviderSummary {
            summary,
            tokens_used,
        })
    }

    async fn admit(&self) -> GlossaResult<bool> {
        self.limiter.admit().await
    }

    async fn rate_limit_status(&self) -> GlossaResult<RateLimitStatus> {
        self.limiter.status().await
    }
}
