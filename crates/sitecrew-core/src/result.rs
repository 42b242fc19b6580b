//! Convenience result type alias for SiteCrew.

use crate::error::AppError;

/// A specialized `Result` type for SiteCrew operations.
pub type AppResult<T> = Result<T, AppError>;
