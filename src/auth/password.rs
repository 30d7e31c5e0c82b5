//! Password hashing and verification using bcrypt

use crate::core::error::{ApiError, Result};

/// A syntactically valid bcrypt hash that matches no real password. Verified
/// against when a login email is unknown, so that response timing does not
/// reveal whether an account exists.
pub const PHANTOM_HASH: &str = "$2b$12$LQv3c1yqBWVHxkd0LHAkCOYz6TtxMQJqhN8/LewdBPj6hsxq6bVd2";

/// Hash a password using bcrypt with the given work factor
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| ApiError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| ApiError::Authentication(format!("Failed to verify password: {}", e)))
}
