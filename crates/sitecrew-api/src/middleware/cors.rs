//! CORS layer configuration.

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;

use sitecrew_core::config::app::CorsConfig;

use sitecrew_auth::csrf::CSRF_HEADER;

/// Builds a CORS layer, or `None` when no origins are configured.
///
/// Session cookies are sent cross-origin, so origins are always explicit.
pub fn build_cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter(|o| o.as_str() != "*")
        .filter_map(|o| o.parse().ok())
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::HeaderName::from_static(CSRF_HEADER)])
            .allow_credentials(true),
    )
}
