//! Tests for the sliding-window rate limiter

use super::types::RateLimiterConfig;
use super::window::SlidingWindowLimiter;
use crate::config::Tier;
use crate::storage::{JsonFileStore, KvStore, MemoryStore};
use std::sync::Arc;
use std::time::Duration;

fn store() -> Arc<dyn KvStore> {
    Arc::new(MemoryStore::new())
}

async fn limiter(capacity: u32, window_ms: u64) -> SlidingWindowLimiter {
    SlidingWindowLimiter::load(store(), RateLimiterConfig::new("test", capacity, window_ms))
        .await
        .unwrap()
}

#[tokio::test]
async fn admits_up_to_capacity_then_denies() {
    let limiter = limiter(3, 60_000).await;

    for _ in 0..3 {
        assert!(limiter.admit().await.unwrap());
    }
    assert!(!limiter.admit().await.unwrap());
}

#[tokio::test]
async fn window_expiry_restores_capacity() {
    let limiter = limiter(2, 200).await;

    assert!(limiter.admit().await.unwrap());
    assert!(limiter.admit().await.unwrap());
    assert!(!limiter.admit().await.unwrap());

    // Wait out the window measured from the earliest admission.
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(limiter.admit().await.unwrap());
}

#[tokio::test]
async fn status_reports_remaining_and_reset() {
    let limiter = limiter(5, 60_000).await;

    let status = limiter.status().await.unwrap();
    assert_eq!(status.remaining, 5);
    assert_eq!(status.requests_in_window, 0);
    assert_eq!(status.reset_in_ms, 0);
    assert_eq!(status.window_ms, 60_000);

    limiter.admit().await.unwrap();
    limiter.admit().await.unwrap();

    let status = limiter.status().await.unwrap();
    assert_eq!(status.remaining, 3);
    assert_eq!(status.requests_in_window, 2);
    assert!(status.reset_in_ms > 0 && status.reset_in_ms <= 60_000);
}

#[tokio::test]
async fn state_survives_reconstruction() {
    let shared: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let config = RateLimiterConfig::new("persist", 2, 60_000);

    let first = SlidingWindowLimiter::load(shared.clone(), config.clone())
        .await
        .unwrap();
    assert!(first.admit().await.unwrap());
    assert!(first.admit().await.unwrap());

    // A fresh limiter over the same store sees the consumed window.
    let second = SlidingWindowLimiter::load(shared, config).await.unwrap();
    assert!(!second.admit().await.unwrap());
    let status = second.status().await.unwrap();
    assert_eq!(status.requests_in_window, 2);
}

#[tokio::test]
async fn state_survives_a_process_restart_via_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("limits.json");
    let config = RateLimiterConfig::new("restart", 2, 60_000);

    {
        let store: Arc<dyn KvStore> = Arc::new(JsonFileStore::new(&path));
        let limiter = SlidingWindowLimiter::load(store, config.clone()).await.unwrap();
        assert!(limiter.admit().await.unwrap());
        assert!(limiter.admit().await.unwrap());
    }

    // Simulates a new process: nothing shared but the file on disk.
    let store: Arc<dyn KvStore> = Arc::new(JsonFileStore::new(&path));
    let limiter = SlidingWindowLimiter::load(store, config).await.unwrap();
    assert!(!limiter.admit().await.unwrap());
}

#[tokio::test]
async fn corrupt_persisted_state_starts_fresh() {
    let shared: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    shared
        .set("ratelimit:fresh", serde_json::json!("not a state object"))
        .await
        .unwrap();

    let limiter =
        SlidingWindowLimiter::load(shared, RateLimiterConfig::new("fresh", 1, 60_000))
            .await
            .unwrap();
    assert!(limiter.admit().await.unwrap());
}

#[tokio::test]
async fn await_admission_times_out() {
    let limiter = limiter(1, 60_000).await;
    assert!(limiter.admit().await.unwrap());

    let admitted = limiter
        .await_admission(Duration::from_millis(120))
        .await
        .unwrap();
    assert!(!admitted);
}

#[tokio::test]
async fn await_admission_succeeds_when_window_frees() {
    let limiter = limiter(1, 200).await;
    assert!(limiter.admit().await.unwrap());

    let admitted = limiter
        .await_admission(Duration::from_secs(2))
        .await
        .unwrap();
    assert!(admitted);
}

#[tokio::test]
async fn capacity_retune_takes_effect() {
    let limiter = limiter(1, 60_000).await;
    assert!(limiter.admit().await.unwrap());
    assert!(!limiter.admit().await.unwrap());

    limiter.set_capacity(3).await;
    assert_eq!(limiter.capacity().await, 3);
    assert!(limiter.admit().await.unwrap());
}

#[tokio::test]
async fn preset_configs_match_tiers() {
    let free = RateLimiterConfig::for_openai(Tier::Free);
    assert_eq!(free.capacity, 60);
    assert_eq!(free.window_ms, 60_000);

    let tier2 = RateLimiterConfig::for_openai(Tier::Tier2);
    assert_eq!(tier2.capacity, 4_000);

    let claude = RateLimiterConfig::for_claude();
    assert_eq!(claude.capacity, 100);
    assert_eq!(claude.window_ms, 3_600_000);
}
