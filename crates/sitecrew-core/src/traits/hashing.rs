//! Password hashing seam between the user store and the auth crate.

use crate::result::AppResult;

/// One-way password hashing.
///
/// The user store needs to hash plaintext passwords found in its mirror
/// file, but the hashing implementation lives in `sitecrew-auth`.
pub trait PasswordHashing: Send + Sync + 'static {
    /// Hash a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Check a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;

    /// Whether `value` already looks like a hash this implementation can verify.
    fn is_hash(&self, value: &str) -> bool;

    /// Whether a stored hash should be replaced by a fresh one.
    fn needs_rehash(&self, _hash: &str) -> bool {
        false
    }
}
