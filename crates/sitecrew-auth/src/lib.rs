//! # sitecrew-auth
//!
//! Authentication and request-security layer for SiteCrew.
//!
//! ## Modules
//!
//! - `password`: Argon2id hashing, with verification of legacy bcrypt hashes
//! - `credentials`: username/password verification against the user store
//! - `throttle`: failed-login counters and temporary lockout per (identity, origin)
//! - `session`: in-memory session table with absolute expiry
//! - `csrf`: per-session anti-forgery token verification
//! - `login`: the login/logout flow tying the above together

pub mod credentials;
pub mod csrf;
pub mod login;
pub mod password;
pub mod session;
pub mod throttle;

pub use credentials::CredentialVerifier;
pub use csrf::CsrfGuard;
pub use login::{LoginService, LoginSuccess, SecurityStats};
pub use password::PasswordHasher;
pub use session::{SessionLookup, SessionManager};
pub use throttle::{FailureOutcome, LockStatus, LoginThrottle, ThrottleKey};
