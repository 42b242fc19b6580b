//! Login and logout flow: throttle, verify, issue session.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use sitecrew_core::error::{AppError, ErrorKind};
use sitecrew_core::result::AppResult;
use sitecrew_entity::{Session, User};
use sitecrew_store::repositories::UserRepository;
use sitecrew_store::{SecurityEvent, SecurityLog};

use crate::credentials::CredentialVerifier;
use crate::session::SessionManager;
use crate::throttle::{FailureOutcome, LockStatus, LoginThrottle, ThrottleKey};

/// A completed login.
#[derive(Debug, Clone)]
pub struct LoginSuccess {
    pub user: User,
    pub session: Session,
}

/// Counters shown on the admin security page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SecurityStats {
    pub active_sessions: usize,
    pub locked_attempts: usize,
}

/// Coordinates the login throttle, credential verifier, and session manager.
pub struct LoginService {
    throttle: Arc<LoginThrottle>,
    verifier: Arc<CredentialVerifier>,
    sessions: Arc<SessionManager>,
    users: Arc<UserRepository>,
    security_log: Arc<SecurityLog>,
}

impl LoginService {
    pub fn new(
        throttle: Arc<LoginThrottle>,
        verifier: Arc<CredentialVerifier>,
        sessions: Arc<SessionManager>,
        users: Arc<UserRepository>,
        security_log: Arc<SecurityLog>,
    ) -> Self {
        Self {
            throttle,
            verifier,
            sessions,
            users,
            security_log,
        }
    }

    /// Performs the login flow:
    ///
    /// 1. Reject immediately if (username, origin) is locked
    /// 2. Verify credentials
    /// 3. On failure count it, possibly locking the key
    /// 4. On success clear the counter, stamp the login, issue a session
    pub async fn login(&self, username: &str, password: &str, origin: &str) -> AppResult<LoginSuccess> {
        let key = ThrottleKey::new(username, origin);

        if let LockStatus::Locked { until } = self.throttle.check_lock(&key).await {
            self.security_log
                .record(
                    SecurityEvent::LoginLocked,
                    &format!("user={} ip={origin} until={}", username.trim(), until.to_rfc3339()),
                )
                .await;
            warn!(username = %username.trim(), origin, "Login rejected, key locked");
            return Err(AppError::locked(until));
        }

        let user = match self.verifier.validate(username, password).await {
            Ok(user) => user,
            Err(e) if e.kind == ErrorKind::InvalidCredentials => {
                return Err(self.on_failure(&key, username, origin, e).await);
            }
            Err(e) => return Err(e),
        };

        self.throttle.register_success(&key).await;
        let session = self.sessions.create(&user.id).await?;

        let user = match self.users.record_login(&user.id, Utc::now()).await {
            Ok(stamped) => stamped,
            Err(e) => {
                warn!(user_id = %user.id, error = %e, "Failed to record last login");
                user
            }
        };

        self.security_log
            .record(
                SecurityEvent::LoginSuccess,
                &format!("user={} ip={origin}", user.username),
            )
            .await;
        info!(user_id = %user.id, username = %user.username, origin, "Login succeeded");

        Ok(LoginSuccess { user, session })
    }

    async fn on_failure(&self, key: &ThrottleKey, username: &str, origin: &str, err: AppError) -> AppError {
        match self.throttle.register_failure(key).await {
            FailureOutcome::LockedOut { until } => {
                self.security_log
                    .record(
                        SecurityEvent::LoginLocked,
                        &format!("user={} ip={origin} until={}", username.trim(), until.to_rfc3339()),
                    )
                    .await;
                AppError::locked(until)
            }
            FailureOutcome::Counted { failures, remaining } => {
                self.security_log
                    .record(
                        SecurityEvent::LoginFailed,
                        &format!("user={} ip={origin} failures={failures}", username.trim()),
                    )
                    .await;
                warn!(username = %username.trim(), origin, failures, remaining, "Login failed");
                err
            }
        }
    }

    /// End the session behind `token`. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) {
        if let Some(session) = self.sessions.revoke(token).await {
            self.security_log
                .record(SecurityEvent::Logout, &format!("user_id={}", session.user_id))
                .await;
        }
    }

    pub async fn stats(&self) -> SecurityStats {
        SecurityStats {
            active_sessions: self.sessions.active_count().await,
            locked_attempts: self.throttle.locked_count().await,
        }
    }
}
