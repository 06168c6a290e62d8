//! OpenAI-compatible provider client (chat-completions wire format)

use super::error_utils;
use super::prompts;
use super::provider_trait::TextProvider;
use super::types::{DetailLevel, ProviderExplanation, ProviderSummary, SummaryLength};
use crate::config::{ProviderConfig, Tier, keys};
use crate::error::{GlossaError, GlossaResult, ProviderErrorKind};
use crate::rate_limiter::{RateLimitStatus, RateLimiterConfig, SlidingWindowLimiter};
use crate::storage::KvStore;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::HeaderMap;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

const NAME: &str = "openai";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default model for explanation requests
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// OpenAI provider handler
#[derive(Debug)]
pub struct OpenAiProvider {
    config: ProviderConfig,
    store: Arc<dyn KvStore>,
    http_client: Client,
    limiter: SlidingWindowLimiter,
    api_key: RwLock<Option<String>>,
}

impl OpenAiProvider {
    /// Create a client, sizing its admission budget from the stored rate tier
    pub async fn connect(
        store: Arc<dyn KvStore>,
        config: ProviderConfig,
        http_client: Client,
    ) -> GlossaResult<Self> {
        let tier = match store.get(keys::OPENAI_TIER).await? {
            Some(value) => Tier::from_setting(value.as_str()),
            None => Tier::default(),
        };
        debug!(?tier, "sizing OpenAI request budget");
        let limiter =
            SlidingWindowLimiter::load(store.clone(), RateLimiterConfig::for_openai(tier)).await?;

        Ok(Self {
            config,
            store,
            http_client,
            limiter,
            api_key: RwLock::new(None),
        })
    }

    /// Send one chat-completion request and extract `(content, tokens, model)`
    async fn chat(&self, system: &str, user: String) -> GlossaResult<(String, Option<u32>, String)> {
        let api_key = self.api_key.read().await.clone().ok_or_else(|| {
            GlossaError::provider(NAME, ProviderErrorKind::Auth, "no credential loaded")
        })?;

        let url = format!("{}/chat/completions", self.config.base_url_or(DEFAULT_BASE_URL));
        let request_body = json!({
            "model": self.config.model,
            "messages": [
                {"role": "system", "content": system},
                {"role": "user", "content": user},
            ],
            "max_tokens": self.config.max_tokens,
            "temperature": 0.3,
        });

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| error_utils::transport_error(e, NAME))?;

        self.retune_from_headers(response.headers()).await;

        if !response.status().is_success() {
            return Err(error_utils::handle_http_error(response, NAME).await);
        }

        let parsed: Value = response
            .json()
            .await
            .map_err(|e| error_utils::parse_error(e, NAME))?;

        let content = parsed["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                error_utils::missing_field_error(NAME, "choices[0].message.content")
            })?;
        let tokens_used = parsed["usage"]["total_tokens"].as_u64().map(|t| t as u32);
        let model = parsed["model"]
            .as_str()
            .unwrap_or(&self.config.model)
            .to_string();

        Ok((content, tokens_used, model))
    }

    /// Adjust the limiter from a backend-echoed quota header, best effort
    ///
    /// Consumers of this client must not rely on the header being present.
    async fn retune_from_headers(&self, headers: &HeaderMap) {
        let echoed = headers
            .get("x-ratelimit-limit-requests")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u32>().ok());
        if let Some(limit) = echoed {
            if limit > 0 {
                self.limiter.set_capacity(limit).await;
            }
        }
    }
}

#[async_trait]
impl TextProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    async fn initialize(&self) -> GlossaResult<bool> {
        let key = match &self.config.api_key {
            Some(explicit) => Some(explicit.clone()),
            None => self
                .store
                .get(keys::OPENAI_API_KEY)
                .await?
                .and_then(|v| v.as_str().map(str::to_string)),
        };

        match key {
            Some(key) if !key.trim().is_empty() => {
                info!(model = %self.config.model, "OpenAI client initialized");
                *self.api_key.write().await = Some(key);
                Ok(true)
            }
            _ => {
                debug!("no OpenAI credential configured");
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
