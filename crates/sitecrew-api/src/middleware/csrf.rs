//! Anti-forgery check for state-changing requests.
//!
//! The token is read from the `X-CSRF-Token` header, or from the
//! `_csrf_token` field of a form or JSON body. The body is buffered and
//! handed on unchanged.

use axum::body::{Body, Bytes, to_bytes};
use axum::extract::{Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use sitecrew_auth::csrf::{CSRF_FORM_FIELD, CSRF_HEADER};
use sitecrew_core::error::AppError;
use sitecrew_service::context::RequestContext;
use sitecrew_store::SecurityEvent;

use crate::error::ApiError;
use crate::state::AppState;

/// Rejects POST/PUT/PATCH/DELETE requests of a resolved session whose token
/// is missing or wrong, before the handler runs.
pub async fn csrf_protect(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    if !state
        .csrf_guard
        .requires_check(request.method().as_str(), &path)
    {
        return next.run(request).await;
    }
    let Some(ctx) = request.extensions().get::<RequestContext>().cloned() else {
        return next.run(request).await;
    };

    let header_token = request
        .headers()
        .get(CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let (request, supplied) = match header_token {
        Some(token) => (request, Some(token)),
        None => match token_from_body(request, state.config.server.body_limit_bytes).await {
            Ok(found) => found,
            Err(e) => return e.into_response(),
        },
    };

    if let Err(e) = state
        .csrf_guard
        .verify_token(&ctx.csrf_token, supplied.as_deref())
    {
        state
            .stores
            .security_log
            .record(
                SecurityEvent::CsrfFailed,
                &format!("user={} ip={} path={path}", ctx.username, ctx.ip_address),
            )
            .await;
        warn!(user_id = %ctx.user_id, path = %path, "CSRF check failed");
        return ApiError(e).into_response();
    }

    next.run(request).await
}

async fn token_from_body(request: Request, limit: usize) -> Result<(Request, Option<String>), ApiError> {
    let content_type = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let is_form = content_type.starts_with("application/x-www-form-urlencoded");
    let is_json = content_type.starts_with("application/json");
    if !is_form && !is_json {
        return Ok((request, None));
    }

    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, limit)
        .await
        .map_err(|e| AppError::validation(format!("Unreadable request body: {e}")))?;

    let token = if is_form {
        form_token(&bytes)
    } else {
        json_token(&bytes)
    };
    Ok((Request::from_parts(parts, Body::from(bytes)), token))
}

fn form_token(bytes: &Bytes) -> Option<String> {
    url::form_urlencoded::parse(bytes)
        .find(|(key, _)| key == CSRF_FORM_FIELD)
        .map(|(_, value)| value.into_owned())
}

fn json_token(bytes: &Bytes) -> Option<String> {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()?
        .get(CSRF_FORM_FIELD)?
        .as_str()
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_token() {
        let body = Bytes::from_static(b"name=Tower+A&_csrf_token=abc%2Fdef");
        assert_eq!(form_token(&body).as_deref(), Some("abc/def"));
        assert_eq!(form_token(&Bytes::from_static(b"name=x")), None);
    }

    #[test]
    fn test_json_token() {
        let body = Bytes::from_static(br#"{"name":"x","_csrf_token":"tok"}"#);
        assert_eq!(json_token(&body).as_deref(), Some("tok"));
        assert_eq!(json_token(&Bytes::from_static(b"not json")), None);
    }
}
