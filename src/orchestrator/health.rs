//! Per-provider health state tracking
//!
//! Lifecycle: unknown until `initialize` settles it into available or
//! unavailable. An available provider oscillates between usable and
//! temporarily disabled as failures accrue and cool-downs expire; an
//! unavailable one (failed init or revoked credential) stays out for the
//! rest of the session.

use crate::error::ProviderErrorKind;
use std::time::{Duration, Instant};

/// Consecutive non-quota failures before a provider is rested
pub(super) const ERROR_THRESHOLD: u32 = 3;

/// Mutable health record for one provider
#[derive(Debug, Clone)]
pub(super) struct ProviderHealth {
    pub initialized: bool,
    pub available: bool,
    pub error_count: u32,
    pub last_error: Option<String>,
    pub disabled_until: Option<Instant>,
}

impl ProviderHealth {
    /// State before `initialize` has run
    pub fn unknown() -> Self {
        Self {
            initialized: false,
            available: false,
            error_count: 0,
            last_error: None,
            disabled_until: None,
        }
    }

    /// State settled by an `initialize` outcome
    pub fn after_init(initialized: bool) -> Self {
        Self {
            initialized,
            available: initialized,
            ..Self::unknown()
        }
    }

    /// Whether the provider may be tried right now
    ///
    /// An expired cool-down re-enables the provider lazily and clears the
    /// stale error count, so a recovered provider starts with a clean slate.
    pub fn is_usable(&mut self, now: Instant) -> bool {
        if !self.initialized || !self.available {
            return false;
        }
        match self.disabled_until {
            Some(until) if until > now => false,
            Some(_) => {
                self.disabled_until = None;
                self.error_count = 0;
                true
            }
            None => true,
        }
    }

    /// Record a successful call
    pub fn record_success(&mut self) {
        self.error_count = 0;
        self.last_error = None;
    }

    /// Record a failed call and apply the matching penalty
    ///
    /// Quota errors rest the provider immediately regardless of prior error
    /// count; auth errors take it out for the session; anything else counts
    /// toward the threshold.
    pub fn record_failure(
        &mut self,
        kind: ProviderErrorKind,
        message: String,
        now: Instant,
        rate_limit_cooldown: Duration,
        error_cooldown: Duration,
    ) {
        self.last_error = Some(message);
        match kind {
            ProviderErrorKind::Auth => {
                self.available = false;
            }
            ProviderErrorKind::RateLimit => {
                self.disabled_until = Some(now + rate_limit_cooldown);
            }
            ProviderErrorKind::Transient | ProviderErrorKind::Request => {
                self.error_count += 1;
                if self.error_count >= ERROR_THRESHOLD {
                    self.disabled_until = Some(now + error_cooldown);
                }
            }
        }
    }

    /// Remaining cool-down as of `now`
    pub fn disabled_for(&self, now: Instant) -> Option<Duration> {
        self.disabled_until
            .map(|until| until.saturating_duration_since(now))
            .filter(|remaining| !remaining.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RL_COOLDOWN: Duration = Duration::from_secs(60);
    const ERR_COOLDOWN: Duration = Duration::from_secs(300);

    fn failing(health: &mut ProviderHealth, kind: ProviderErrorKind, now: Instant) {
        health.record_failure(kind, "boom".into(), now, RL_COOLDOWN, ERR_COOLDOWN);
    }

    #[test]
    fn uninitialized_is_never_usable() {
        let mut health = ProviderHealth::unknown();
        assert!(!health.is_usable(Instant::now()));

        let mut health = ProviderHealth::after_init(false);
        assert!(!health.is_usable(Instant::now()));
    }

    #[test]
    fn rate_limit_disables_immediately() {
        let now = Instant::now();
        let mut health = ProviderHealth::after_init(true);
        assert!(health.is_usable(now));

        failing(&mut health, ProviderErrorKind::RateLimit, now);
        assert!(!health.is_usable(now));
        assert_eq!(health.disabled_for(now), Some(RL_COOLDOWN));
    }

    #[test]
    fn transient_failures_disable_at_threshold() {
        let now = Instant::now();
        let mut health = ProviderHealth::after_init(true);

        failing(&mut health, ProviderErrorKind::Transient, now);
        failing(&mut health, ProviderErrorKind::Request, now);
        assert!(health.is_usable(now));

        failing(&mut health, ProviderErrorKind::Transient, now);
        assert!(!health.is_usable(now));
        assert_eq!(health.disabled_for(now), Some(ERR_COOLDOWN));
    }

    #[test]
    fn success_resets_the_error_count() {
        let now = Instant::now();
        let mut health = ProviderHealth::after_init(true);

        failing(&mut health, ProviderErrorKind::Transient, now);
        failing(&mut health, ProviderErrorKind::Transient, now);
        health.record_success();
        assert_eq!(health.error_count, 0);
        assert!(health.last_error.is_none());

        // The slate is clean: two more failures still stay below the threshold.
        failing(&mut health, ProviderErrorKind::Transient, now);
        failing(&mut health, ProviderErrorKind::Transient, now);
        assert!(health.is_usable(now));
    }

    #[test]
    fn expired_cooldown_reenables_with_clean_slate() {
        let now = Instant::now();
        let mut health = ProviderHealth::after_init(true);
        for _ in 0..3 {
            failing(&mut health, ProviderErrorKind::Transient, now);
        }
        assert!(!health.is_usable(now));

        let later = now + ERR_COOLDOWN + Duration::from_secs(1);
        assert!(health.is_usable(later));
        assert_eq!(health.error_count, 0);
        assert!(health.disabled_until.is_none());
    }

    #[test]
    fn auth_failure_is_terminal_for_the_session() {
        let now = Instant::now();
        let mut health = ProviderHealth::after_init(true);
        failing(&mut health, ProviderErrorKind::Auth, now);

        assert!(!health.is_usable(now));
        // No cool-down applies: availability itself is gone.
        assert!(health.disabled_until.is_none());
        assert!(!health.is_usable(now + Duration::from_secs(3600)));
    }
}
