//! Axum middleware stack.

pub mod cors;
pub mod csrf;
pub mod logging;
pub mod rbac;
pub mod session;
