//! Session entity model.

use std::fmt;

use chrono::{DateTime, Utc};

use sitecrew_core::types::id::UserId;

/// A live login session. Held only in memory.
#[derive(Clone)]
pub struct Session {
    /// Opaque bearer token carried in the session cookie.
    pub token: String,
    /// Owner of the session.
    pub user_id: UserId,
    /// Anti-forgery token bound to this session.
    pub csrf_token: String,
    pub created_at: DateTime<Utc>,
    /// Absolute expiry. The session is dead at and after this instant.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session has expired as of `now`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("created_at", &self.created_at)
            .field("expires_at", &self.expires_at)
            .finish_non_exhaustive()
    }
}
