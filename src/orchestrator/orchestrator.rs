//! Unified explain/summarize orchestration

use super::chain::build_chain;
use super::health::ProviderHealth;
use super::stats::UsageStats;
use super::types::{
    CachedResponse, ExplainOptions, Explanation, Operation, ProviderStatus, RateLimitReport,
    StatusSnapshot, SummarizeOptions, Summary,
};
use crate::cache::{CacheKey, DEFAULT_CAPACITY, DEFAULT_TTL, ResponseCache};
use crate::config::{ProviderConfig, keys};
use crate::error::{GlossaError, GlossaResult, ProviderErrorKind};
use crate::providers::{
    ClaudeProvider, LocalProvider, OpenAiProvider, ProviderInstance, ProviderKind, TextProvider,
    claude, openai,
};
use crate::storage::KvStore;
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Cool-down after a backend-reported quota error
const RATE_LIMIT_COOLDOWN: Duration = Duration::from_secs(60);
/// Cool-down after the consecutive-failure threshold is reached
const ERROR_COOLDOWN: Duration = Duration::from_secs(300);

/// Owns the provider registry, health state, cache, and statistics
///
/// All orchestrated calls walk their fallback chain strictly sequentially;
/// providers are never raced. The local heuristic terminates every chain, so
/// a call with valid input always produces a result.
#[derive(Debug)]
pub struct Orchestrator {
    providers: Vec<(ProviderKind, ProviderInstance)>,
    health: RwLock<HashMap<ProviderKind, ProviderHealth>>,
    cache: ResponseCache<CachedResponse>,
    stats: RwLock<UsageStats>,
    store: Arc<dyn KvStore>,
    preferred: RwLock<Option<ProviderKind>>,
    rate_limit_cooldown: Duration,
    error_cooldown: Duration,
}

impl Orchestrator {
    /// Create an orchestrator over the full provider set with default models
    pub async fn connect(store: Arc<dyn KvStore>) -> GlossaResult<Self> {
        let http_client = reqwest::Client::new();
        let openai_client = OpenAiProvider::connect(
            store.clone(),
            ProviderConfig::new(openai::DEFAULT_MODEL),
            http_client.clone(),
        )
        .await?;
        let claude_client = ClaudeProvider::connect(
            store.clone(),
            ProviderConfig::new(claude::DEFAULT_MODEL),
            http_client,
        )
        .await?;

        let providers = vec![
            (ProviderKind::OpenAi, ProviderInstance::OpenAi(openai_client)),
            (ProviderKind::Claude, ProviderInstance::Claude(claude_client)),
            (ProviderKind::Local, ProviderInstance::Local(LocalProvider::new())),
        ];
        Ok(Self::with_providers(store, providers))
    }

    /// Create an orchestrator over a caller-assembled provider set
    pub(crate) fn with_providers(
        store: Arc<dyn KvStore>,
        providers: Vec<(ProviderKind, ProviderInstance)>,
    ) -> Self {
        let health = providers
            .iter()
            .map(|(kind, _)| (*kind, ProviderHealth::unknown()))
            .collect();

        Self {
            providers,
            health: RwLock::new(health),
            cache: ResponseCache::new(DEFAULT_CAPACITY, DEFAULT_TTL),
            stats: RwLock::new(UsageStats::default()),
            store,
            preferred: RwLock::new(None),
            rate_limit_cooldown: RATE_LIMIT_COOLDOWN,
            error_cooldown: ERROR_COOLDOWN,
        }
    }

    /// Override the failure cool-downs
    pub fn with_cooldowns(mut self, rate_limit: Duration, error: Duration) -> Self {
        self.rate_limit_cooldown = rate_limit;
        self.error_cooldown = error;
        self
    }

    /// Initialize every registered client and load persisted preferences
    ///
    /// A client without a credential is skipped, not fatal. Returns whether
    /// any remote provider came up; the engine works either way because the
    /// local heuristic needs no initialization.
    pub async fn initialize(&self) -> GlossaResult<bool> {
        let mut any_remote = false;
        for (kind, instance) in &self.providers {
            let initialized = match instance.initialize().await {
                Ok(initialized) => initialized,
                Err(error) => {
                    warn!(provider = %kind, "provider initialization failed: {}", error);
                    false
                }
            };
            if initialized && *kind != ProviderKind::Local {
                any_remote = true;
            }
            self.health
                .write()
                .await
                .insert(*kind, ProviderHealth::after_init(initialized));
        }

        if let Some(value) = self.store.get(keys::PREFERRED_PROVIDER).await? {
            if let Some(name) = value.as_str() {
                match ProviderKind::parse(name) {
                    Some(kind) => *self.preferred.write().await = Some(kind),
                    None => warn!(name, "ignoring unknown preferred provider"),
                }
            }
        }

        info!(any_remote, "orchestrator initialized");
        Ok(any_remote)
    }

    /// Explain text, falling back across providers as needed
    pub async fn explain(&self, text: &str, options: &ExplainOptions) -> GlossaResult<Explanation> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GlossaError::invalid_input("no text to explain"));
        }
        self.stats.write().await.record_request();

        let key = CacheKey::new(Operation::Explain.as_str(), options.level.tag(), text);
        if !options.skip_cache {
            if let Some(CachedResponse::Explanation(hit)) = self.cache.get(&key).await {
                return Ok(hit);
            }
        }

        let chain = self.resolve_chain(Operation::Explain, options.preferred_provider).await;
        debug!(?chain, "walking explanation chain");

        let mut last_error = None;
        for kind in chain {
            let Some(instance) = self.instance(kind) else {
                continue;
            };
            if !self.clear_to_try(kind, instance).await {
                continue;
            }

            let started = Instant::now();
            match instance.explain(text, options.level).await {
                Ok(raw) => {
                    self.note_success(kind, started.elapsed()).await;
                    let analysis =
                        (kind == ProviderKind::Local).then(|| LocalProvider::analyze(text));
                    let result = Explanation {
                        explanation: raw.explanation,
                        provider: kind.as_str().to_string(),
                        level: options.level,
                        timestamp: Utc::now(),
                        model: Some(raw.model),
                        tokens_used: raw.tokens_used,
                        analysis,
                    };
                    if kind != ProviderKind::Local {
                        self.cache
                            .put(key, CachedResponse::Explanation(result.clone()))
                            .await;
                    }
                    return Ok(result);
                }
                Err(error) => {
                    self.note_failure(kind, &error).await;
                    last_error = Some(error);
                }
            }
        }

        // The local heuristic terminates every chain and cannot fail on
        // non-empty input; reaching this point means the fallback itself broke.
        Err(last_error.unwrap_or_else(|| {
            GlossaError::provider(
                ProviderKind::Local.as_str(),
                ProviderErrorKind::Request,
                "no provider produced a result",
            )
        }))
    }

    /// Summarize text, falling back across providers as needed
    pub async fn summarize(
        &self,
        text: &str,
        options: &SummarizeOptions,
    ) -> GlossaResult<Summary> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GlossaError::invalid_input("no text to summarize"));
        }
        self.stats.write().await.record_request();

        let key = CacheKey::new(Operation::Summarize.as_str(), options.length.tag(), text);
        if !options.skip_cache {
            if let Some(CachedResponse::Summary(hit)) = self.cache.get(&key).await {
                return Ok(hit);
            }
        }

        let chain = self
            .resolve_chain(Operation::Summarize, options.preferred_provider)
            .await;
        debug!(?chain, "walking summarization chain");

        let mut last_error = None;
        for kind in chain {
            let Some(instance) = self.instance(kind) else {
                continue;
            };
            if !self.clear_to_try(kind, instance).await {
                continue;
            }

            let started = Instant::now();
            match instance.summarize(text, options.length).await {
                Ok(raw) => {
                    self.note_success(kind, started.elapsed()).await;
                    let result = Summary {
                        original_length: text.chars().count(),
                        summary_length: raw.summary.chars().count(),
                        summary: raw.summary,
                        provider: kind.as_str().to_string(),
                        timestamp: Utc::now(),
                    };
                    if kind != ProviderKind::Local {
                        self.cache
                            .put(key, CachedResponse::Summary(result.clone()))
                            .await;
                    }
                    return Ok(result);
                }
                Err(error) => {
                    self.note_failure(kind, &error).await;
                    last_error = Some(error);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            GlossaError::provider(
                ProviderKind::Local.as_str(),
                ProviderErrorKind::Request,
                "no provider produced a result",
            )
        }))
    }

    /// Probe every client's rate limiter, capturing failures independently
    pub async fn check_rate_limits(&self) -> HashMap<String, RateLimitReport> {
        let mut reports = HashMap::new();
        for (kind, instance) in &self.providers {
            let report = match instance.rate_limit_status().await {
                Ok(status) => RateLimitReport {
                    status: Some(status),
                    error: None,
                },
                Err(error) => RateLimitReport {
                    status: None,
                    error: Some(error.to_string()),
                },
            };
            reports.insert(kind.as_str().to_string(), report);
        }
        reports
    }

    /// Read-only usage statistics snapshot
    pub async fn get_statistics(&self) -> UsageStats {
        self.stats.read().await.clone()
    }

    /// Read-only orchestrator status snapshot
    pub async fn get_status(&self) -> StatusSnapshot {
        let now = Instant::now();
        let health = self.health.read().await;
        let providers = self
            .providers
            .iter()
            .map(|(kind, _)| {
                let entry = health.get(kind).cloned().unwrap_or_else(ProviderHealth::unknown);
                ProviderStatus {
                    name: kind.as_str().to_string(),
                    initialized: entry.initialized,
                    available: entry.available,
                    error_count: entry.error_count,
                    disabled_for_ms: entry.disabled_for(now).map(|d| d.as_millis() as u64),
                    last_error: entry.last_error,
                }
            })
            .collect();

        let preferred = *self.preferred.read().await;
        StatusSnapshot {
            providers,
            cache_entries: self.cache.len().await,
            preferred_provider: preferred.map(|kind| kind.as_str().to_string()),
        }
    }

    /// Purge every cached response
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
    }

    /// Set (or clear) the preferred provider and persist the flag
    pub async fn set_preferred_provider(
        &self,
        preferred: Option<ProviderKind>,
    ) -> GlossaResult<()> {
        match preferred {
            Some(kind) => {
                self.store
                    .set(keys::PREFERRED_PROVIDER, json!(kind.as_str()))
                    .await?
            }
            None => self.store.remove(keys::PREFERRED_PROVIDER).await?,
        }
        *self.preferred.write().await = preferred;
        Ok(())
    }

    /// The chain for one call: explicit preference wins over the stored flag
    async fn resolve_chain(
        &self,
        operation: Operation,
        explicit: Option<ProviderKind>,
    ) -> Vec<ProviderKind> {
        let preferred = match explicit {
            Some(kind) => Some(kind),
            None => *self.preferred.read().await,
        };
        build_chain(operation, preferred)
    }

    /// Health gate and local admission gate for one chain entry
    async fn clear_to_try(&self, kind: ProviderKind, instance: &ProviderInstance) -> bool {
        {
            let mut health = self.health.write().await;
            let usable = health
                .get_mut(&kind)
                .is_some_and(|entry| entry.is_usable(Instant::now()));
            if !usable {
                debug!(provider = %kind, "skipping provider: not usable");
                return false;
            }
        }

        match instance.admit().await {
            Ok(true) => true,
            Ok(false) => {
                info!(provider = %kind, "skipping provider: admission denied");
                false
            }
            Err(error) => {
                warn!(provider = %kind, "admission check failed: {}", error);
                false
            }
        }
    }

    async fn note_success(&self, kind: ProviderKind, elapsed: Duration) {
        if let Some(entry) = self.health.write().await.get_mut(&kind) {
            entry.record_success();
        }
        self.stats
            .write()
            .await
            .record_success(kind.as_str(), elapsed.as_secs_f64() * 1_000.0);
    }

    async fn note_failure(&self, kind: ProviderKind, error: &GlossaError) {
        warn!(provider = %kind, "provider failed, advancing chain: {}", error);
        let error_kind = error
            .provider_kind()
            .unwrap_or(ProviderErrorKind::Transient);
        if let Some(entry) = self.health.write().await.get_mut(&kind) {
            entry.record_failure(
                error_kind,
                error.to_string(),
                Instant::now(),
                self.rate_limit_cooldown,
                self.error_cooldown,
            );
        }
        self.stats
            .write()
            .await
            .record_error(kind.as_str(), error.to_string());
    }

    fn instance(&self, kind: ProviderKind) -> Option<&ProviderInstance> {
        self.providers
            .iter()
            .find(|(registered, _)| *registered == kind)
            .map(|(_, instance)| instance)
    }

    #[cfg(test)]
    pub(super) fn mock_provider(&self, kind: ProviderKind) -> &crate::providers::mock::MockProvider {
        match self.instance(kind) {
            Some(ProviderInstance::Mock(mock)) => mock,
            _ => panic!("provider {kind} is not a mock"),
        }
    }
}
