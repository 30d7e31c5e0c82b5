//! Authentication request/response models

use crate::db::models::User;
use serde::{Deserialize, Serialize};

/// Register request
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// User info returned in responses (never includes the password hash)
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub created_at: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            phone: user.phone,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Token envelope returned on login and registration
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// RFC 3339 timestamp at which the access token expires
    pub expires_at: String,
    /// Access token lifetime in seconds
    pub expires_in: u64,
}

/// Payload of a successful login/registration response
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthData {
    pub user: UserInfo,
    pub tokens: TokenPair,
}

/// Successful login/registration response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: String,
    pub data: AuthData,
}

/// Claims echo returned by the profile endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileData {
    pub id: String,
    pub email: String,
    pub role: String,
}

/// Profile response envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub message: String,
    pub data: ProfileData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_pair_uses_camel_case() {
        let pair = TokenPair {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: "2025-09-20T10:15:00Z".to_string(),
            expires_in: 900,
        };
        let json = serde_json::to_value(&pair).unwrap();

        assert!(json.get("accessToken").is_some());
        assert!(json.get("refreshToken").is_some());
        assert!(json.get("expiresAt").is_some());
        assert_eq!(json["expiresIn"], 900);
    }

    #[test]
    fn test_register_request_tolerates_missing_fields() {
        // Missing fields deserialize to empty strings so the validator can
        // report them, instead of failing body extraction with a 422.
        let req: RegisterRequest = serde_json::from_str(r#"{"email": "a@b.c"}"#).unwrap();
        assert_eq!(req.email, "a@b.c");
        assert!(req.name.is_empty());
        assert!(req.password.is_empty());
    }
}
