//! Token issuance and verification
//!
//! Access tokens are short-lived and carry user identity and role; refresh
//! tokens are longer-lived, carry only the user id plus a type marker, and
//! are signed with a distinct secret so one cannot stand in for the other.
//! Both are stateless: signature and expiry are the sole authorization proof.

use crate::core::error::{ApiError, Result};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Type marker carried by refresh tokens
pub const REFRESH_TOKEN_TYPE: &str = "refresh";

/// Claims carried by an access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub user_id: String,
    pub email: String,
    pub role: String,
    pub exp: usize,
}

/// Claims carried by a refresh token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshClaims {
    pub user_id: String,
    pub token_type: String,
    pub exp: usize,
}

fn expiry_timestamp(ttl_secs: u64) -> Result<usize> {
    chrono::Utc::now()
        .checked_add_signed(chrono::Duration::seconds(ttl_secs as i64))
        .map(|t| t.timestamp() as usize)
        .ok_or_else(|| ApiError::Internal("Failed to calculate token expiration".to_string()))
}

/// Issue a signed access token for the given identity
pub fn issue_access_token(
    user_id: &str,
    email: &str,
    role: &str,
    secret: &str,
    ttl_secs: u64,
) -> Result<String> {
    let claims = AccessClaims {
        user_id: user_id.to_string(),
        email: email.to_string(),
        role: role.to_string(),
        exp: expiry_timestamp(ttl_secs)?,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to generate access token: {}", e)))
}

/// Issue a signed refresh token for the given user
pub fn issue_refresh_token(user_id: &str, secret: &str, ttl_secs: u64) -> Result<String> {
    let claims = RefreshClaims {
        user_id: user_id.to_string(),
        token_type: REFRESH_TOKEN_TYPE.to_string(),
        exp: expiry_timestamp(ttl_secs)?,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(format!("Failed to generate refresh token: {}", e)))
}

/// Verify an access token and extract its claims
pub fn verify_access_token(token: &str, secret: &str) -> Result<AccessClaims> {
    decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::InvalidToken("Invalid or expired token".to_string()))
}

/// Verify a refresh token, including its type marker
pub fn verify_refresh_token(token: &str, secret: &str) -> Result<RefreshClaims> {
    let claims = decode::<RefreshClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::InvalidToken("Invalid or expired token".to_string()))?;

    if claims.token_type != REFRESH_TOKEN_TYPE {
        return Err(ApiError::InvalidToken("Invalid or expired token".to_string()));
    }

    Ok(claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS_SECRET: &str = "test-access-secret";
    const REFRESH_SECRET: &str = "test-refresh-secret";

    #[test]
    fn test_access_token_round_trip() {
        let token =
            issue_access_token("u-1", "ana@example.com", "user", ACCESS_SECRET, 900).unwrap();
        let claims = verify_access_token(&token, ACCESS_SECRET).unwrap();

        assert_eq!(claims.user_id, "u-1");
        assert_eq!(claims.email, "ana@example.com");
        assert_eq!(claims.role, "user");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token =
            issue_access_token("u-1", "ana@example.com", "user", ACCESS_SECRET, 900).unwrap();
        let result = verify_access_token(&token, "some-other-secret");
        assert!(matches!(result, Err(ApiError::InvalidToken(_))));
    }

    #[test]
    fn test_tampered_token_rejected() {
        let token =
            issue_access_token("u-1", "ana@example.com", "user", ACCESS_SECRET, 900).unwrap();
        let mut tampered = token.clone();
        tampered.replace_range(token.len() - 2.., "xx");

        let result = verify_access_token(&tampered, ACCESS_SECRET);
        assert!(matches!(result, Err(ApiError::InvalidToken(_))));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Expired well past the default 60 second validation leeway
        let claims = AccessClaims {
            user_id: "u-1".to_string(),
            email: "ana@example.com".to_string(),
            role: "user".to_string(),
            exp: (chrono::Utc::now().timestamp() - 3600) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(ACCESS_SECRET.as_bytes()),
        )
        .unwrap();

        let result = verify_access_token(&token, ACCESS_SECRET);
        assert!(matches!(result, Err(ApiError::InvalidToken(_))));
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let token = issue_refresh_token("u-1", REFRESH_SECRET, 604_800).unwrap();
        let claims = verify_refresh_token(&token, REFRESH_SECRET).unwrap();

        assert_eq!(claims.user_id, "u-1");
        assert_eq!(claims.token_type, REFRESH_TOKEN_TYPE);
    }

    #[test]
    fn test_refresh_token_cannot_pass_as_access_token() {
        // Different secrets mean the signature check alone rejects it
        let token = issue_refresh_token("u-1", REFRESH_SECRET, 604_800).unwrap();
        let result = verify_access_token(&token, ACCESS_SECRET);
        assert!(matches!(result, Err(ApiError::InvalidToken(_))));
    }

    #[test]
    fn test_refresh_type_marker_enforced() {
        let claims = RefreshClaims {
            user_id: "u-1".to_string(),
            token_type: "access".to_string(),
            exp: (chrono::Utc::now().timestamp() + 900) as usize,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(REFRESH_SECRET.as_bytes()),
        )
        .unwrap();

        let result = verify_refresh_token(&token, REFRESH_SECRET);
        assert!(matches!(result, Err(ApiError::InvalidToken(_))));
    }
}
