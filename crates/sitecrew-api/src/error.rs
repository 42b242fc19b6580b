//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use sitecrew_core::error::{AppError, ErrorKind};

/// Where an unauthenticated browser is sent.
pub const LOGIN_REDIRECT: &str = "/login";

/// Where a failed login is sent.
pub const INVALID_CREDENTIALS_REDIRECT: &str = "/login?error=invalid_credentials";

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Handler error: an `AppError` on its way to becoming a response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_of(err.kind);

        let (message, details) = match err.kind {
            ErrorKind::InvalidCredentials => (
                err.message,
                Some(with_redirect(err.details, INVALID_CREDENTIALS_REDIRECT)),
            ),
            ErrorKind::SessionExpired => {
                (err.message, Some(with_redirect(err.details, LOGIN_REDIRECT)))
            }
            _ if err.is_server_error() => {
                tracing::error!(
                    kind = %err.kind,
                    error = %err.message,
                    source = ?err.source,
                    "Request failed with server error"
                );
                ("Internal server error".to_string(), None)
            }
            _ => (err.message, err.details),
        };

        let body = ApiErrorResponse {
            success: false,
            error: err.kind.to_string(),
            message,
            details,
        };
        (status, Json(body)).into_response()
    }
}

fn status_of(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::InvalidCredentials | ErrorKind::SessionExpired => StatusCode::UNAUTHORIZED,
        ErrorKind::Csrf | ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::Locked => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::Storage
        | ErrorKind::Serialization
        | ErrorKind::Configuration
        | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn with_redirect(details: Option<Value>, target: &str) -> Value {
    let mut map = match details {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    };
    map.insert("redirect".to_string(), Value::String(target.to_string()));
    Value::Object(map)
}
