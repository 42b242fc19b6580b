//! # sitecrew-api
//!
//! HTTP API layer for SiteCrew built on Axum.
//!
//! Provides the REST endpoints, middleware (session resolution, CSRF,
//! request logging, CORS), extractors, DTOs, and error mapping.

pub mod app;
pub mod cookies;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::build_app;
pub use error::{ApiError, ApiResult};
pub use state::AppState;
