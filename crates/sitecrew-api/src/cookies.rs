//! Session cookie formatting and parsing.

use axum::http::header::InvalidHeaderValue;
use axum::http::{HeaderMap, HeaderValue};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};

use sitecrew_core::config::auth::AuthConfig;
use sitecrew_entity::Session;

const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// `Set-Cookie` value carrying a freshly issued session.
pub fn session_cookie(
    config: &AuthConfig,
    session: &Session,
    now: DateTime<Utc>,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let max_age = (session.expires_at - now).num_seconds().max(0);
    HeaderValue::from_str(&format_cookie(
        config,
        &session.token,
        session.expires_at,
        max_age,
    ))
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn expired_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    HeaderValue::from_str(&format_cookie(config, "", DateTime::<Utc>::UNIX_EPOCH, 0))
}

/// The session token sent by the client, if any.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(cookie_name)
        .map(|c| c.value().trim().to_string())
        .filter(|t| !t.is_empty())
}

fn format_cookie(config: &AuthConfig, value: &str, expires: DateTime<Utc>, max_age: i64) -> String {
    let mut cookie = format!(
        "{}={value}; Path=/; Expires={}; Max-Age={max_age}; HttpOnly; SameSite=Lax",
        config.cookie_name,
        expires.format(HTTP_DATE),
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}
