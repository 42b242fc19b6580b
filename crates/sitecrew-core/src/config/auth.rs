//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication, login throttling, and cookie configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Failed login attempts per (identity, origin) before lockout.
    #[serde(default = "default_max_failed")]
    pub max_failed_attempts: u32,
    /// Window in minutes over which failures are counted.
    #[serde(default = "default_window")]
    pub attempt_window_minutes: u64,
    /// Lockout duration in minutes.
    #[serde(default = "default_lockout")]
    pub lockout_duration_minutes: u64,
    /// Name of the session cookie.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Mark the session cookie `Secure`. Enable behind TLS.
    #[serde(default)]
    pub cookie_secure: bool,
    /// Account created at startup when the user collection is empty.
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: default_max_failed(),
            attempt_window_minutes: default_window(),
            lockout_duration_minutes: default_lockout(),
            cookie_name: default_cookie_name(),
            cookie_secure: false,
            bootstrap_admin: None,
        }
    }
}

/// Initial administrator credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapAdminConfig {
    /// Login name.
    pub username: String,
    /// Plaintext password, hashed before it is stored.
    pub password: String,
    /// Display name.
    #[serde(default = "default_admin_name")]
    pub name: String,
}

fn default_max_failed() -> u32 {
    5
}

fn default_window() -> u64 {
    15
}

fn default_lockout() -> u64 {
    15
}

fn default_cookie_name() -> String {
    "session_token".to_string()
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}
