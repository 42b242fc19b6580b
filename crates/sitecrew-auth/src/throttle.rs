//! Failed-login throttling keyed by (identity, origin).
//!
//! Each key moves `Clear -> Accumulating(n) -> Locked(until)`. Reaching the
//! failure threshold inside the window locks the key for a fixed duration
//! and resets its counter; a successful login clears it.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use sitecrew_core::config::auth::AuthConfig;
use sitecrew_entity::user::model::normalize_username;

/// Throttle table key: normalized login name plus client origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThrottleKey(String);

impl ThrottleKey {
    pub fn new(identity: &str, origin: &str) -> Self {
        Self(format!("{}|{}", normalize_username(identity), origin.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Default)]
struct AttemptState {
    failures: u32,
    first_failure: Option<DateTime<Utc>>,
    locked_until: Option<DateTime<Utc>>,
}

impl AttemptState {
    fn is_locked_at(&self, now: DateTime<Utc>) -> bool {
        self.locked_until.is_some_and(|until| now < until)
    }
}

/// Result of the pre-verification lock check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    Clear,
    Locked { until: DateTime<Utc> },
}

/// Result of recording a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// The failure was counted; `remaining` more lock the key.
    Counted { failures: u32, remaining: u32 },
    /// The key is locked, either already or as a result of this failure.
    LockedOut { until: DateTime<Utc> },
}

/// In-memory attempt table behind one reader/writer lock.
#[derive(Debug)]
pub struct LoginThrottle {
    attempts: RwLock<HashMap<ThrottleKey, AttemptState>>,
    max_failures: u32,
    window: Duration,
    lockout: Duration,
}

impl LoginThrottle {
    pub fn new(config: &AuthConfig) -> Self {
        Self::with_limits(
            config.max_failed_attempts,
            Duration::minutes(config.attempt_window_minutes as i64),
            Duration::minutes(config.lockout_duration_minutes as i64),
        )
    }

    pub fn with_limits(max_failures: u32, window: Duration, lockout: Duration) -> Self {
        Self {
            attempts: RwLock::new(HashMap::new()),
            max_failures: max_failures.max(1),
            window,
            lockout,
        }
    }

    /// Pure read; never changes the table.
    pub async fn check_lock(&self, key: &ThrottleKey) -> LockStatus {
        self.check_lock_at(key, Utc::now()).await
    }

    pub async fn check_lock_at(&self, key: &ThrottleKey, now: DateTime<Utc>) -> LockStatus {
        match self.attempts.read().await.get(key) {
            Some(state) if state.is_locked_at(now) => LockStatus::Locked {
                until: state.locked_until.unwrap_or(now),
            },
            _ => LockStatus::Clear,
        }
    }

    pub async fn register_failure(&self, key: &ThrottleKey) -> FailureOutcome {
        self.register_failure_at(key, Utc::now()).await
    }

    pub async fn register_failure_at(&self, key: &ThrottleKey, now: DateTime<Utc>) -> FailureOutcome {
        let mut attempts = self.attempts.write().await;
        self.purge_stale(&mut attempts, now);

        let state = attempts.entry(key.clone()).or_default();
        if let Some(until) = state.locked_until {
            if now < until {
                return FailureOutcome::LockedOut { until };
            }
            state.locked_until = None;
        }

        match state.first_failure {
            Some(first) if now - first <= self.window => state.failures += 1,
            _ => {
                state.failures = 1;
                state.first_failure = Some(now);
            }
        }

        if state.failures >= self.max_failures {
            let until = now + self.lockout;
            state.locked_until = Some(until);
            state.failures = 0;
            state.first_failure = Some(now);
            warn!(key = %key.as_str(), until = %until, "Login locked after repeated failures");
            return FailureOutcome::LockedOut { until };
        }

        FailureOutcome::Counted {
            failures: state.failures,
            remaining: self.max_failures - state.failures,
        }
    }

    /// Forget the key entirely.
    pub async fn register_success(&self, key: &ThrottleKey) {
        if self.attempts.write().await.remove(key).is_some() {
            info!(key = %key.as_str(), "Login throttle cleared");
        }
    }

    /// Number of keys currently locked.
    pub async fn locked_count(&self) -> usize {
        self.locked_count_at(Utc::now()).await
    }

    pub async fn locked_count_at(&self, now: DateTime<Utc>) -> usize {
        self.attempts
            .read()
            .await
            .values()
            .filter(|s| s.is_locked_at(now))
            .count()
    }

    /// Drop entries that are neither locked nor inside an open window.
    fn purge_stale(&self, attempts: &mut HashMap<ThrottleKey, AttemptState>, now: DateTime<Utc>) {
        attempts.retain(|_, s| {
            s.is_locked_at(now) || s.first_failure.is_some_and(|first| now - first <= self.window)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throttle() -> LoginThrottle {
        LoginThrottle::with_limits(5, Duration::minutes(15), Duration::minutes(15))
    }

    #[tokio::test]
    async fn test_fifth_failure_locks() {
        let throttle = throttle();
        let key = ThrottleKey::new("Ivan", "10.0.0.1");
        let now = Utc::now();
        for i in 1..5 {
            assert_eq!(
                throttle.register_failure_at(&key, now).await,
                FailureOutcome::Counted { failures: i, remaining: 5 - i }
            );
        }
        let outcome = throttle.register_failure_at(&key, now).await;
        assert_eq!(outcome, FailureOutcome::LockedOut { until: now + Duration::minutes(15) });
        assert!(matches!(throttle.check_lock_at(&key, now).await, LockStatus::Locked { .. }));
        assert_eq!(throttle.locked_count_at(now).await, 1);
    }

    #[tokio::test]
    async fn test_failure_while_locked_does_not_extend() {
        let throttle = throttle();
        let key = ThrottleKey::new("ivan", "10.0.0.1");
        let now = Utc::now();
        for _ in 0..5 {
            throttle.register_failure_at(&key, now).await;
        }
        let later = now + Duration::minutes(5);
        assert_eq!(
            throttle.register_failure_at(&key, later).await,
            FailureOutcome::LockedOut { until: now + Duration::minutes(15) }
        );
        let after = now + Duration::minutes(15);
        assert_eq!(throttle.check_lock_at(&key, after).await, LockStatus::Clear);
    }

    #[tokio::test]
    async fn test_success_resets_counter() {
        let throttle = throttle();
        let key = ThrottleKey::new("ivan", "10.0.0.1");
        let now = Utc::now();
        for _ in 0..4 {
            throttle.register_failure_at(&key, now).await;
        }
        throttle.register_success(&key).await;
        assert_eq!(
            throttle.register_failure_at(&key, now).await,
            FailureOutcome::Counted { failures: 1, remaining: 4 }
        );
    }

    #[tokio::test]
    async fn test_window_expiry_restarts_count() {
        let throttle = throttle();
        let key = ThrottleKey::new("ivan", "10.0.0.1");
        let now = Utc::now();
        for _ in 0..4 {
            throttle.register_failure_at(&key, now).await;
        }
        let later = now + Duration::minutes(16);
        assert_eq!(
            throttle.register_failure_at(&key, later).await,
            FailureOutcome::Counted { failures: 1, remaining: 4 }
        );
    }

    #[tokio::test]
    async fn test_keys_are_per_origin_and_case_insensitive() {
        let throttle = throttle();
        let now = Utc::now();
        let a = ThrottleKey::new("Ivan", "10.0.0.1");
        for _ in 0..5 {
            throttle.register_failure_at(&a, now).await;
        }
        assert!(matches!(
            throttle.check_lock_at(&ThrottleKey::new(" ivan", "10.0.0.1"), now).await,
            LockStatus::Locked { .. }
        ));
        assert_eq!(
            throttle.check_lock_at(&ThrottleKey::new("ivan", "10.0.0.2"), now).await,
            LockStatus::Clear
        );
    }
}
