//! Scripted provider used by orchestrator tests

use super::provider_trait::TextProvider;
use super::types::{DetailLevel, ProviderExplanation, ProviderSummary, SummaryLength};
use crate::error::{GlossaError, GlossaResult, ProviderErrorKind};
use crate::rate_limiter::RateLimitStatus;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// One scripted reaction to an explain/summarize call
#[derive(Debug, Clone)]
pub(crate) enum MockOutcome {
    Succeed,
    Fail(ProviderErrorKind),
}

/// Provider double with a scriptable outcome queue
///
/// Outcomes queued with [`queue`](Self::queue) are consumed in order; once
/// the queue is empty every call takes the default outcome.
#[derive(Debug)]
pub(crate) struct MockProvider {
    name: &'static str,
    init_result: bool,
    admit_result: AtomicBool,
    status_fails: AtomicBool,
    script: Mutex<VecDeque<MockOutcome>>,
    default_outcome: MockOutcome,
    calls: AtomicUsize,
}

impl MockProvider {
    /// A provider that initializes and always succeeds
    pub fn succeeding(name: &'static str) -> Self {
        Self::with_default(name, MockOutcome::Succeed)
    }

    /// A provider that initializes but always fails with `kind`
    pub fn failing(name: &'static str, kind: ProviderErrorKind) -> Self {
        Self::with_default(name, MockOutcome::Fail(kind))
    }

    /// A provider whose `initialize` reports a missing credential
    pub fn uninitialized(name: &'static str) -> Self {
        let mut provider = Self::with_default(name, MockOutcome::Succeed);
        provider.init_result = false;
        provider
    }

    fn with_default(name: &'static str, default_outcome: MockOutcome) -> Self {
        Self {
            name,
            init_result: true,
            admit_result: AtomicBool::new(true),
            status_fails: AtomicBool::new(false),
            script: Mutex::new(VecDeque::new()),
            default_outcome,
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue one outcome ahead of the default
    pub fn queue(&self, outcome: MockOutcome) {
        self.script.lock().unwrap().push_back(outcome);
    }

    /// Control the local admission decision
    pub fn set_admit(&self, admit: bool) {
        self.admit_result.store(admit, Ordering::SeqCst);
    }

    /// Make `rate_limit_status` fail
    pub fn set_status_fails(&self, fails: bool) {
        self.status_fails.store(fails, Ordering::SeqCst);
    }

    /// Number of explain/summarize invocations so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_outcome(&self) -> MockOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default_outcome.clone())
    }
}

#[async_trait]
impl TextProvider for MockProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn initialize(&self) -> GlossaResult<bool> {
        Ok(self.init_result)
    }

    async fn explain(&self, _text: &str, _level: DetailLevel) -> GlossaResult<ProviderExplanation> {
        match self.next_outcome() {
            MockOutcome::Succeed => Ok(ProviderExplanation {
                explanation: format!("{} explanation", self.name),
                tokens_used: Some(10),
                model: format!("{}-model", self.name),
            }),
            MockOutcome::Fail(kind) => {
                Err(GlossaError::provider(self.name, kind, "scripted failure"))
            }
        }
    }

    async fn summarize(
        &self,
        _text: &str,
        _length: SummaryLength,
    ) -> GlossaResult<ProviderSummary> {
        match self.next_outcome() {
            MockOutcome::Succeed => Ok(ProviderSummary {
                summary: format!("{} summary", self.name),
                tokens_used: Some(10),
            }),
            MockOutcome::Fail(kind) => {
                Err(GlossaError::provider(self.name, kind, "scripted failure"))
            }
        }
    }

    async fn admit(&self) -> GlossaResult<bool> {
        Ok(self.admit_result.load(Ordering::SeqCst))
    }

    async fn rate_limit_status(&self) -> GlossaResult<RateLimitStatus> {
        if self.status_fails.load(Ordering::SeqCst) {
            return Err(GlossaError::provider(
                self.name,
                ProviderErrorKind::Transient,
                "scripted status failure",
            ));
        }
        Ok(RateLimitStatus {
            remaining: 10,
            window_ms: 60_000,
            requests_in_window: 0,
            reset_in_ms: 0,
        })
    }
}
