//! Anti-forgery token verification.

use subtle::ConstantTimeEq;

use sitecrew_core::error::AppError;
use sitecrew_core::result::AppResult;
use sitecrew_entity::Session;

/// Form field carrying the token on HTML form posts.
pub const CSRF_FORM_FIELD: &str = "_csrf_token";

/// Header carrying the token on script requests.
pub const CSRF_HEADER: &str = "x-csrf-token";

/// Decides which requests need a token and checks it against the session.
#[derive(Debug, Clone)]
pub struct CsrfGuard {
    exempt_paths: Vec<String>,
}

impl CsrfGuard {
    /// A guard that never checks the given paths, typically the login endpoint.
    pub fn new<I, S>(exempt_paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exempt_paths: exempt_paths.into_iter().map(Into::into).collect(),
        }
    }

    /// POST, PUT, PATCH and DELETE change state.
    pub fn is_state_changing(method: &str) -> bool {
        ["POST", "PUT", "PATCH", "DELETE"]
            .iter()
            .any(|m| m.eq_ignore_ascii_case(method))
    }

    pub fn is_exempt(&self, path: &str) -> bool {
        self.exempt_paths.iter().any(|p| p == path)
    }

    /// Whether a request with this method and path must carry a token.
    pub fn requires_check(&self, method: &str, path: &str) -> bool {
        Self::is_state_changing(method) && !self.is_exempt(path)
    }

    /// Compare the supplied token with the session's in constant time.
    pub fn verify(&self, session: &Session, supplied: Option<&str>) -> AppResult<()> {
        self.verify_token(&session.csrf_token, supplied)
    }

    pub fn verify_token(&self, expected: &str, supplied: Option<&str>) -> AppResult<()> {
        let Some(supplied) = supplied.map(str::trim).filter(|s| !s.is_empty()) else {
            return Err(AppError::csrf());
        };
        if expected.is_empty() {
            return Err(AppError::csrf());
        }
        if bool::from(expected.as_bytes().ct_eq(supplied.as_bytes())) {
            Ok(())
        } else {
            Err(AppError::csrf())
        }
    }
}
