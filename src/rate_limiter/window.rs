//! Sliding-window limiter implementation

use super::types::{PersistedState, RateLimitStatus, RateLimiterConfig};
use crate::config::keys::RATE_LIMIT_PREFIX;
use crate::error::GlossaResult;
use crate::storage::KvStore;
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Longest single sleep while polling for admission
const MAX_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Shortest single sleep while polling for admission
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug)]
struct WindowState {
    capacity: u32,
    timestamps: Vec<i64>,
}

/// Sliding-window rate limiter with state persisted across restarts
///
/// Cloning shares the underlying window, so clones coordinate admission
/// together. The persisted store carries no cross-process lock: two processes
/// sharing one identifier can each admit a request that a single limiter
/// would have rejected. One limiter per identifier per process is the
/// supported scope.
#[derive(Debug, Clone)]
pub struct SlidingWindowLimiter {
    identifier: String,
    window_ms: u64,
    state: Arc<Mutex<WindowState>>,
    store: Arc<dyn KvStore>,
}

impl SlidingWindowLimiter {
    /// Create a limiter, reloading any state persisted under the identifier
    ///
    /// Corrupt or missing persisted state starts the window fresh; a capacity
    /// change in `config` wins over whatever capacity was stored.
    pub async fn load(store: Arc<dyn KvStore>, config: RateLimiterConfig) -> GlossaResult<Self> {
        let key = storage_key(&config.identifier);
        let timestamps = match store.get(&key).await? {
            Some(value) => match serde_json::from_value::<PersistedState>(value) {
                Ok(persisted) => persisted.request_timestamps,
                Err(e) => {
                    warn!(
                        identifier = %config.identifier,
                        "discarding unreadable rate limiter state: {}", e
                    );
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let limiter = Self {
            identifier: config.identifier,
            window_ms: config.window_ms,
            state: Arc::new(Mutex::new(WindowState {
                capacity: config.capacity,
                timestamps,
            })),
            store,
        };

        // Drop anything that aged out while the process was down.
        let mut state = limiter.state.lock().await;
        limiter.prune(&mut state, now_ms());
        drop(state);

        Ok(limiter)
    }

    /// The identifier state is persisted under
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Consume one unit of window capacity
    ///
    /// Returns whether the request was admitted; the admission timestamp is
    /// recorded and the state persisted either way.
    pub async fn admit(&self) -> GlossaResult<bool> {
        let now = now_ms();
        let mut state = self.state.lock().await;
        self.prune(&mut state, now);

        let admitted = (state.timestamps.len() as u32) < state.capacity;
        if admitted {
            state.timestamps.push(now);
        } else {
            debug!(
                identifier = %self.identifier,
                in_window = state.timestamps.len(),
                "admission denied"
            );
        }

        self.persist(&state).await?;
        Ok(admitted)
    }

    /// Current admission status without consuming capacity
    pub async fn status(&self) -> GlossaResult<RateLimitStatus> {
        let now = now_ms();
        let mut state = self.state.lock().await;
        let pruned = self.prune(&mut state, now);
        if pruned {
            self.persist(&state).await?;
        }

        let in_window = state.timestamps.len() as u32;
        let reset_in_ms = state
            .timestamps
            .first()
            .map(|earliest| (earliest + self.window_ms as i64 - now).max(0) as u64)
            .unwrap_or(0);

        Ok(RateLimitStatus {
            remaining: state.capacity.saturating_sub(in_window),
            window_ms: self.window_ms,
            requests_in_window: in_window,
            reset_in_ms,
        })
    }

    /// Poll [`admit`](Self::admit) until admitted or the deadline passes
    ///
    /// Sleep intervals track the time until the earliest recorded admission
    /// leaves the window, bounded to at most five seconds per poll.
    pub async fn await_admission(&self, max_wait: Duration) -> GlossaResult<bool> {
        let deadline = Instant::now() + max_wait;
        loop {
            if self.admit().await? {
                return Ok(true);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(false);
            }

            let reset_hint = Duration::from_millis(self.status().await?.reset_in_ms);
            let interval = reset_hint
                .clamp(MIN_POLL_INTERVAL, MAX_POLL_INTERVAL)
                .min(remaining);
            debug!(
                identifier = %self.identifier,
                wait_ms = interval.as_millis() as u64,
                "waiting for admission"
            );
            tokio::time::sleep(interval).await;
        }
    }

    /// Re-tune the window capacity at runtime
    ///
    /// Used by clients that read backend-echoed quota headers. Recorded
    /// admissions are kept; a lowered capacity takes effect on the next
    /// decision.
    pub async fn set_capacity(&self, capacity: u32) {
        let mut state = self.state.lock().await;
        if state.capacity != capacity {
            debug!(
                identifier = %self.identifier,
                old = state.capacity,
                new = capacity,
                "rate limiter capacity re-tuned"
            );
            state.capacity = capacity;
        }
    }

    /// Current capacity
    pub async fn capacity(&self) -> u32 {
        self.state.lock().await.capacity
    }

    /// Drop timestamps older than the window; returns whether any were removed
    fn prune(&self, state: &mut WindowState, now: i64) -> bool {
        let cutoff = now - self.window_ms as i64;
        let before = state.timestamps.len();
        state.timestamps.retain(|&ts| ts > cutoff);
        state.timestamps.len() != before
    }

    async fn persist(&self, state: &WindowState) -> GlossaResult<()> {
        let persisted = PersistedState {
            identifier: self.identifier.clone(),
            capacity: state.capacity,
            window_ms: self.window_ms,
            request_timestamps: state.timestamps.clone(),
        };
        self.store
            .set(&storage_key(&self.identifier), serde_json::to_value(&persisted)?)
            .await
    }
}

fn storage_key(identifier: &str) -> String {
    format!("{}{}", RATE_LIMIT_PREFIX, identifier)
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}
