//! Role checks for route guarding.

use crate::error::ApiError;
use crate::extractors::AuthUser;

/// Checks that the authenticated user has the Admin role.
pub fn require_admin(auth: &AuthUser) -> Result<(), ApiError> {
    auth.require_admin().map_err(ApiError)
}
