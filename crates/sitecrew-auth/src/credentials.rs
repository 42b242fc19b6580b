//! Username/password verification.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use sitecrew_core::error::AppError;
use sitecrew_core::result::AppResult;
use sitecrew_core::traits::PasswordHashing;
use sitecrew_entity::User;
use sitecrew_store::repositories::UserRepository;

/// Checks a username/password pair against the user store.
///
/// An unknown username and a wrong password produce the same error and
/// cost the same hash verification.
pub struct CredentialVerifier {
    users: Arc<UserRepository>,
    hasher: Arc<dyn PasswordHashing>,
    decoy_hash: String,
}

impl CredentialVerifier {
    pub fn new(users: Arc<UserRepository>, hasher: Arc<dyn PasswordHashing>) -> AppResult<Self> {
        let decoy_hash = hasher.hash_password("decoy-password-never-matches")?;
        Ok(Self {
            users,
            hasher,
            decoy_hash,
        })
    }

    /// Return the matching user or `InvalidCredentials`.
    pub async fn validate(&self, username: &str, password: &str) -> AppResult<User> {
        let Some(user) = self.users.find_by_username(username).await else {
            let _ = self.hasher.verify_password(password, &self.decoy_hash);
            debug!("Login attempt for unknown username");
            return Err(AppError::invalid_credentials());
        };

        let matches = match self.hasher.verify_password(password, &user.password_hash) {
            Ok(matches) => matches,
            Err(e) => {
                error!(user_id = %user.id, error = %e, "Stored password hash is unusable");
                false
            }
        };
        if !matches {
            return Err(AppError::invalid_credentials());
        }

        if self.hasher.needs_rehash(&user.password_hash) {
            self.upgrade_hash(&user, password).await;
        }

        Ok(user)
    }

    async fn upgrade_hash(&self, user: &User, password: &str) {
        let result = match self.hasher.hash_password(password) {
            Ok(hash) => self.users.set_password_hash(&user.id, hash).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(()) => info!(user_id = %user.id, "Upgraded legacy password hash"),
            Err(e) => warn!(user_id = %user.id, error = %e, "Failed to upgrade legacy password hash"),
        }
    }
}
