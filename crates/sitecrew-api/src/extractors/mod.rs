//! Custom Axum extractors.

pub mod auth;
pub mod origin;
pub mod payload;

pub use auth::AuthUser;
pub use origin::ClientOrigin;
pub use payload::Payload;
