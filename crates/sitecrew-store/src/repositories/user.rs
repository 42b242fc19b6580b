//! User repository implementation.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use sitecrew_core::error::AppError;
use sitecrew_core::result::AppResult;
use sitecrew_core::traits::{PasswordHashing, Record, Repository};
use sitecrew_core::types::id::UserId;
use sitecrew_entity::user::model::normalize_username;
use sitecrew_entity::{User, UserRole};

use crate::collection::Collection;

/// Repository for user accounts.
///
/// Accepts either a plaintext password or an existing hash in
/// `password_hash`; plaintext is always hashed before it is stored.
pub struct UserRepository {
    records: Collection<User>,
    hasher: Arc<dyn PasswordHashing>,
}

impl UserRepository {
    /// Load users from the mirror, hashing any plaintext passwords and
    /// promoting the first account when no admin exists.
    pub async fn open(path: impl Into<PathBuf>, hasher: Arc<dyn PasswordHashing>) -> AppResult<Self> {
        let fixup_hasher = Arc::clone(&hasher);
        let records = Collection::open_with(path, move |users: &mut Vec<User>| {
            let mut rehashed = 0usize;
            for user in users.iter_mut() {
                if !user.password_hash.is_empty() && !fixup_hasher.is_hash(&user.password_hash) {
                    user.password_hash = fixup_hasher.hash_password(&user.password_hash)?;
                    rehashed += 1;
                }
            }
            if rehashed > 0 {
                warn!(count = rehashed, "Hashed plaintext passwords found in mirror");
            }

            if !users.iter().any(User::is_admin) {
                if let Some(first) = users.first_mut() {
                    info!(user_id = %first.id, username = %first.username, "No admin present, promoting first user");
                    first.role = UserRole::Admin;
                }
            }
            Ok(())
        })
        .await?;

        Ok(Self { records, hasher })
    }

    /// Find a user by login name, ignoring case and surrounding whitespace.
    pub async fn find_by_username(&self, username: &str) -> Option<User> {
        let key = normalize_username(username);
        self.records
            .find(|u| u.normalized_username() == key)
            .await
    }

    /// Whether a user with this identifier exists.
    pub async fn exists(&self, id: &UserId) -> bool {
        self.records.find(|u| &u.id == id).await.is_some()
    }

    /// Stamp a successful login.
    pub async fn record_login(&self, id: &UserId, at: DateTime<Utc>) -> AppResult<User> {
        self.records
            .lock()
            .await
            .modify(id, |user| user.last_login_at = Some(at))
            .await
    }

    /// Replace the stored hash, used when upgrading legacy hashes.
    pub async fn set_password_hash(&self, id: &UserId, hash: String) -> AppResult<()> {
        self.records
            .lock()
            .await
            .modify(id, |user| user.password_hash = hash)
            .await?;
        Ok(())
    }

    fn hash_if_plaintext(&self, user: &mut User) -> AppResult<()> {
        if !user.password_hash.is_empty() && !self.hasher.is_hash(&user.password_hash) {
            user.password_hash = self.hasher.hash_password(&user.password_hash)?;
        }
        Ok(())
    }
}

fn ensure_unique_username<'a>(
    mut existing: impl Iterator<Item = &'a User>,
    candidate: &User,
) -> AppResult<()> {
    let key = candidate.normalized_username();
    if existing.any(|u| u.id != candidate.id && u.normalized_username() == key) {
        return Err(AppError::conflict(format!(
            "Username '{}' is already taken",
            candidate.username
        )));
    }
    Ok(())
}

#[async_trait]
impl Repository<User> for UserRepository {
    async fn find_all(&self) -> Vec<User> {
        self.records.snapshot().await
    }

    async fn find_by_id(&self, id: &UserId) -> AppResult<User> {
        self.records.get(id).await
    }

    async fn create(&self, mut user: User) -> AppResult<User> {
        user.normalize();
        user.validate()?;
        self.hash_if_plaintext(&mut user)?;

        let mut guard = self.records.lock().await;
        ensure_unique_username(guard.iter(), &user)?;
        guard.insert(user).await
    }

    async fn update(&self, mut user: User) -> AppResult<User> {
        user.normalize();
        if user.password_hash.is_empty() {
            let stored = self.records.get(&user.id).await?;
            user.password_hash = stored.password_hash;
        }
        user.validate()?;
        self.hash_if_plaintext(&mut user)?;

        let mut guard = self.records.lock().await;
        let stored = guard
            .get(&user.id)
            .ok_or_else(|| AppError::not_found(format!("user '{}' not found", user.id)))?;
        if user.last_login_at.is_none() {
            user.last_login_at = stored.last_login_at;
        }
        ensure_unique_username(guard.iter(), &user)?;
        guard.replace(user).await
    }

    async fn delete(&self, id: &UserId) -> AppResult<()> {
        self.records.lock().await.remove(id, Utc::now()).await?;
        Ok(())
    }

    async fn count(&self) -> usize {
        self.records.len().await
    }
}
