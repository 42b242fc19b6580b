//! User entity model.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use sitecrew_core::result::AppResult;
use sitecrew_core::traits::{DeletionPolicy, Record};
use sitecrew_core::types::id::UserId;

use super::role::UserRole;
use crate::validate::{require, trim_in_place};

/// A login account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user identifier.
    #[serde(default)]
    pub id: UserId,
    /// Login name, unique ignoring case.
    pub username: String,
    /// One-way password hash. Plaintext values found on load are hashed.
    #[serde(rename = "password", default)]
    pub password_hash: String,
    /// Display name.
    pub name: String,
    #[serde(default)]
    pub phone: String,
    /// Access level.
    #[serde(default, alias = "status")]
    pub role: UserRole,
    /// Last successful login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Build a new account with a password hash already computed.
    pub fn new(
        username: impl Into<String>,
        password_hash: impl Into<String>,
        name: impl Into<String>,
        role: UserRole,
    ) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            password_hash: password_hash.into(),
            name: name.into(),
            phone: String::new(),
            role,
            last_login_at: None,
        }
    }

    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Username key used for lookups and uniqueness.
    pub fn normalized_username(&self) -> String {
        normalize_username(&self.username)
    }

    /// Required-field checks.
    pub fn validate(&self) -> AppResult<()> {
        require(&self.username, "username")?;
        require(&self.password_hash, "password")?;
        require(&self.name, "name")?;
        Ok(())
    }
}

/// Canonical form of a login name.
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

impl Record for User {
    type Id = UserId;

    const KIND: &'static str = "user";
    const DELETION: DeletionPolicy = DeletionPolicy::Physical;

    fn id(&self) -> &UserId {
        &self.id
    }

    fn set_id(&mut self, id: UserId) {
        self.id = id;
    }

    fn normalize(&mut self) {
        trim_in_place(&mut self.username);
        trim_in_place(&mut self.name);
        trim_in_place(&mut self.phone);
    }

    fn ordering(a: &Self, b: &Self) -> Ordering {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.username.cmp(&b.username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_status_key() {
        let json = r#"{"id":"u1","username":"boss","password":"x","name":"Boss","status":"admin"}"#;
        let user: User = serde_json::from_str(json).expect("deserialize");
        assert!(user.is_admin());
        assert_eq!(user.id.as_str(), "u1");
        assert!(user.last_login_at.is_none());
    }

    #[test]
    fn test_validate_requires_name() {
        let mut user = User::new("ivan", "hash", "  ", UserRole::User);
        user.normalize();
        assert!(user.validate().is_err());
    }

    #[test]
    fn test_normalized_username() {
        let user = User::new("  Ivan.P ", "hash", "Ivan", UserRole::User);
        assert_eq!(user.normalized_username(), "ivan.p");
    }
}
