//! Unified application error types for SiteCrew.
//!
//! All crates map their internal errors into [`AppError`] for consistent
//! propagation through the ? operator.

use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Top-level error kind categorization used across the entire application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// The requested record was not found.
    NotFound,
    /// Input validation failed. The collection is left unchanged.
    Validation,
    /// A uniqueness rule was violated (duplicate username, double link).
    Conflict,
    /// Username or password did not match. Both cases are reported identically.
    InvalidCredentials,
    /// The login identity is temporarily locked out.
    Locked,
    /// The session token is absent, unknown, or past its expiry.
    SessionExpired,
    /// The anti-forgery token was missing or did not match.
    Csrf,
    /// The caller is authenticated but lacks the required role.
    Forbidden,
    /// Reading or writing a mirror file failed.
    Storage,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A configuration error occurred.
    Configuration,
    /// An internal server error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::InvalidCredentials => write!(f, "INVALID_CREDENTIALS"),
            Self::Locked => write!(f, "LOCKED"),
            Self::SessionExpired => write!(f, "SESSION_EXPIRED"),
            Self::Csrf => write!(f, "CSRF"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::Storage => write!(f, "STORAGE"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout SiteCrew.
///
/// Crate-specific errors are mapped into `AppError` using `From` impls
/// or explicit `.map_err()` calls.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Structured context surfaced to API clients (lockout expiry, redirect).
    pub details: Option<serde_json::Value>,
    /// Optional underlying cause.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
            source: Some(Box::new(source)),
        }
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    /// Create the single, undifferentiated credential failure.
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorKind::InvalidCredentials, "Invalid username or password")
    }

    /// Create a lockout error carrying the lockout expiry.
    pub fn locked(until: DateTime<Utc>) -> Self {
        Self::new(
            ErrorKind::Locked,
            format!("Too many failed login attempts, locked until {}", until.to_rfc3339()),
        )
        .with_details(serde_json::json!({ "locked_until": until }))
    }

    /// Create a session error. Expired and unknown tokens share this kind.
    pub fn session_expired() -> Self {
        Self::new(ErrorKind::SessionExpired, "Session expired or missing")
    }

    /// Create a CSRF rejection.
    pub fn csrf() -> Self {
        Self::new(ErrorKind::Csrf, "Invalid or missing CSRF token")
    }

    /// Create a forbidden error.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    /// Create a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Whether the error is one of the server-side failure kinds.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Storage
                | ErrorKind::Serialization
                | ErrorKind::Configuration
                | ErrorKind::Internal
        )
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            details: self.details.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(ErrorKind::Storage, format!("I/O error: {err}"), err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locked_carries_expiry() {
        let until = Utc::now();
        let err = AppError::locked(until);
        assert_eq!(err.kind, ErrorKind::Locked);
        let details = err.details.expect("details");
        assert!(details.get("locked_until").is_some());
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = io.into();
        assert_eq!(err.kind, ErrorKind::Storage);
        assert!(err.is_server_error());
    }

    #[test]
    fn test_clone_keeps_details() {
        let err = AppError::validation("bad").with_details(serde_json::json!({"field": "name"}));
        let cloned = err.clone();
        assert_eq!(cloned.kind, ErrorKind::Validation);
        assert_eq!(cloned.details, err.details);
    }
}
