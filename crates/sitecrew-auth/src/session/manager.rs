//! In-memory session table.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::{debug, info};

use sitecrew_core::config::session::SessionConfig;
use sitecrew_core::error::AppError;
use sitecrew_core::result::AppResult;
use sitecrew_core::types::id::UserId;
use sitecrew_entity::Session;

use super::token::{CSRF_TOKEN_BYTES, SESSION_TOKEN_BYTES, generate};

/// Outcome of looking up a token.
#[derive(Debug, Clone)]
pub enum SessionLookup {
    Active(Session),
    /// The token existed but was swept by this lookup.
    Expired,
    Missing,
}

/// Issues, resolves, and revokes sessions.
///
/// Sessions are process-local and do not survive a restart. Every lookup
/// first sweeps all expired sessions.
#[derive(Debug)]
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionManager {
    pub fn new(config: &SessionConfig) -> Self {
        Self::with_ttl(Duration::hours(config.ttl_hours as i64))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Start a session for `user_id` with fresh session and CSRF tokens.
    pub async fn create(&self, user_id: &UserId) -> AppResult<Session> {
        self.create_at(user_id, Utc::now()).await
    }

    pub async fn create_at(&self, user_id: &UserId, now: DateTime<Utc>) -> AppResult<Session> {
        let csrf_token = generate(CSRF_TOKEN_BYTES)?;
        let mut sessions = self.sessions.write().await;

        let mut token = generate(SESSION_TOKEN_BYTES)?;
        while sessions.contains_key(&token) {
            token = generate(SESSION_TOKEN_BYTES)?;
        }

        let session = Session {
            token: token.clone(),
            user_id: user_id.clone(),
            csrf_token,
            created_at: now,
            expires_at: now + self.ttl,
        };
        sessions.insert(token, session.clone());

        info!(user_id = %user_id, expires_at = %session.expires_at, "Session created");
        Ok(session)
    }

    /// Resolve a token, treating expired and unknown tokens alike.
    pub async fn resolve(&self, token: &str) -> AppResult<Session> {
        self.resolve_at(token, Utc::now()).await
    }

    pub async fn resolve_at(&self, token: &str, now: DateTime<Utc>) -> AppResult<Session> {
        match self.lookup_at(token, now).await {
            SessionLookup::Active(session) => Ok(session),
            SessionLookup::Expired | SessionLookup::Missing => Err(AppError::session_expired()),
        }
    }

    /// Sweep expired sessions, then look the token up.
    pub async fn lookup_at(&self, token: &str, now: DateTime<Utc>) -> SessionLookup {
        let mut sessions = self.sessions.write().await;
        let mut target_expired = false;
        sessions.retain(|key, session| {
            let keep = !session.is_expired_at(now);
            if !keep && key == token {
                target_expired = true;
            }
            keep
        });

        if target_expired {
            debug!("Session expired");
            return SessionLookup::Expired;
        }
        match sessions.get(token) {
            Some(session) => SessionLookup::Active(session.clone()),
            None => SessionLookup::Missing,
        }
    }

    /// End a session. Unknown tokens are ignored.
    pub async fn revoke(&self, token: &str) -> Option<Session> {
        let removed = self.sessions.write().await.remove(token);
        if let Some(session) = &removed {
            info!(user_id = %session.user_id, "Session revoked");
        }
        removed
    }

    /// End every session of a user. Returns how many were ended.
    pub async fn revoke_user(&self, user_id: &UserId) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| &s.user_id != user_id);
        let revoked = before - sessions.len();
        if revoked > 0 {
            info!(user_id = %user_id, count = revoked, "User sessions revoked");
        }
        revoked
    }

    /// Drop every expired session. Returns how many were dropped.
    pub async fn sweep_expired_at(&self, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        before - sessions.len()
    }

    /// Sessions that have not yet expired.
    pub async fn active_count(&self) -> usize {
        let now = Utc::now();
        self.sessions
            .read()
            .await
            .values()
            .filter(|s| !s.is_expired_at(now))
            .count()
    }
}
