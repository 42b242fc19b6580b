//! Request context carrying the authenticated user and session.

use chrono::{DateTime, Utc};
use serde::Serialize;

use sitecrew_core::error::AppError;
use sitecrew_core::result::AppResult;
use sitecrew_core::types::id::UserId;
use sitecrew_entity::{Session, User, UserRole};

/// Context for the current authenticated request.
///
/// Produced once by session resolution and passed into service methods so
/// that every operation knows *who* is acting and from *which* session.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    pub username: String,
    /// Display name, recorded as the creator of new records.
    pub name: String,
    /// The user's role as currently stored.
    pub role: UserRole,
    /// Anti-forgery token of the session.
    pub csrf_token: String,
    pub session_expires_at: DateTime<Utc>,
    /// Client origin (first forwarded address or peer address).
    pub ip_address: String,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
    #[serde(skip)]
    pub session_token: String,
}

impl RequestContext {
    /// Build the context from a resolved session and its owner.
    pub fn new(session: &Session, user: &User, ip_address: impl Into<String>) -> Self {
        Self {
            user_id: user.id.clone(),
            username: user.username.clone(),
            name: user.name.clone(),
            role: user.role,
            csrf_token: session.csrf_token.clone(),
            session_expires_at: session.expires_at,
            ip_address: ip_address.into(),
            request_time: Utc::now(),
            session_token: session.token.clone(),
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// `Forbidden` unless the current user is an admin.
    pub fn require_admin(&self) -> AppResult<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("Administrator role required"))
        }
    }
}
