//! Argon2id password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use sitecrew_core::error::AppError;
use sitecrew_core::result::AppResult;
use sitecrew_core::traits::PasswordHashing;

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Handles password hashing and verification using Argon2id.
///
/// Hashes written by older deployments with bcrypt still verify and are
/// reported by [`PasswordHashing::needs_rehash`] so they can be upgraded.
#[derive(Debug, Clone)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Creates a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    fn is_argon2(value: &str) -> bool {
        value.starts_with("$argon2") && PasswordHash::new(value).is_ok()
    }

    fn is_bcrypt(value: &str) -> bool {
        value.len() == 60 && BCRYPT_PREFIXES.iter().any(|p| value.starts_with(p))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHashing for PasswordHasher {
    /// Hashes a plaintext password using Argon2id with a random salt.
    fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool> {
        if Self::is_bcrypt(hash) {
            return bcrypt::verify(password, hash)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")));
        }

        let parsed_hash = PasswordHash::new(hash)
            .map_err(|e| AppError::internal(format!("Invalid password hash format: {e}")))?;

        let argon2 = Argon2::default();
        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AppError::internal(format!(
                "Password verification failed: {e}"
            ))),
        }
    }

    fn is_hash(&self, value: &str) -> bool {
        Self::is_argon2(value) || Self::is_bcrypt(value)
    }

    fn needs_rehash(&self, hash: &str) -> bool {
        Self::is_bcrypt(hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("s3cret").expect("hash");
        assert!(hasher.is_hash(&hash));
        assert!(hasher.verify_password("s3cret", &hash).expect("verify"));
        assert!(!hasher.verify_password("wrong", &hash).expect("verify"));
        assert!(!hasher.needs_rehash(&hash));
    }

    #[test]
    fn test_plaintext_is_not_a_hash() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.is_hash("s3cret"));
        assert!(!hasher.is_hash("$argon2id$garbage"));
    }

    #[test]
    fn test_legacy_bcrypt_verifies_and_needs_rehash() {
        let hasher = PasswordHasher::new();
        let legacy = bcrypt::hash("s3cret", 4).expect("bcrypt");
        assert!(hasher.is_hash(&legacy));
        assert!(hasher.needs_rehash(&legacy));
        assert!(hasher.verify_password("s3cret", &legacy).expect("verify"));
        assert!(!hasher.verify_password("wrong", &legacy).expect("verify"));
    }
}
