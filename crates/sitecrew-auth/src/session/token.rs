//! Random token generation.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;

use sitecrew_core::error::AppError;
use sitecrew_core::result::AppResult;

/// Bytes of entropy in a session token.
pub const SESSION_TOKEN_BYTES: usize = 32;

/// Bytes of entropy in a CSRF token.
pub const CSRF_TOKEN_BYTES: usize = 24;

/// Generate a URL-safe token from `len` bytes of OS randomness.
pub fn generate(len: usize) -> AppResult<String> {
    let mut bytes = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AppError::internal(format!("Random token generation failed: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(bytes))
}
