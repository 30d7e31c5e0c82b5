//! Authentication API handlers

use crate::api::handlers::AppState;
use crate::auth::jwt::{issue_access_token, issue_refresh_token};
use crate::auth::models::{
    AuthData, AuthResponse, LoginRequest, ProfileData, ProfileResponse, RegisterRequest, TokenPair,
    UserInfo,
};
use crate::auth::middleware::AuthUser;
use crate::auth::password::{hash_password, verify_password, PHANTOM_HASH};
use crate::auth::validate::validate_registration;
use crate::core::error::{ApiError, Result};
use crate::db::models::User;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use uuid::Uuid;

/// Issue the access/refresh token pair for a user
fn issue_token_pair(state: &AppState, user: &User) -> Result<TokenPair> {
    let security = &state.security;

    let access_token = issue_access_token(
        &user.id,
        &user.email,
        &user.role,
        &security.jwt_secret,
        security.access_token_ttl,
    )?;
    let refresh_token = issue_refresh_token(
        &user.id,
        &security.jwt_refresh_secret,
        security.refresh_token_ttl,
    )?;

    let expires_at = chrono::Utc::now()
        + chrono::Duration::seconds(security.access_token_ttl as i64);

    Ok(TokenPair {
        access_token,
        refresh_token,
        expires_at: expires_at.to_rfc3339(),
        expires_in: security.access_token_ttl,
    })
}

/// Handler for POST /api/v1/auth/login
///
/// Looks the user up by email and compares the password against the stored
/// bcrypt hash. Unknown email and wrong password produce the same response;
/// for unknown emails a phantom hash is verified so response timing does not
/// reveal whether the account exists.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse + std::fmt::Debug> {
    tracing::info!(email = %req.email, "Login attempt");

    let email = req.email.trim().to_lowercase();

    let user = match state.user_repo.find_by_email(&email).await? {
        Some(user) => user,
        None => {
            let _ = verify_password(&req.password, PHANTOM_HASH);
            tracing::warn!(email = %email, "Login with unknown email");
            return Err(ApiError::Authentication("Invalid credentials".to_string()));
        }
    };

    if !verify_password(&req.password, &user.password_hash)? {
        tracing::warn!(email = %email, "Login with invalid password");
        return Err(ApiError::Authentication("Invalid credentials".to_string()));
    }

    let tokens = issue_token_pair(&state, &user)?;

    tracing::info!(user_id = %user.id, email = %user.email, "Login successful");

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful".to_string(),
        data: AuthData {
            user: UserInfo::from(user),
            tokens,
        },
    }))
}

/// Handler for POST /api/v1/auth/register
///
/// The duplicate-email pre-check is an optimization only: the store's unique
/// constraint is authoritative, and a constraint violation from a concurrent
/// registration surfaces as the same 409 conflict.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse + std::fmt::Debug> {
    tracing::info!(email = %req.email, "Registration attempt");

    validate_registration(&req.name, &req.email, &req.phone, &req.password)
        .map_err(ApiError::Validation)?;

    let email = req.email.trim().to_lowercase();

    if state.user_repo.find_by_email(&email).await?.is_some() {
        tracing::warn!(email = %email, "Registration with existing email");
        return Err(ApiError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&req.password, state.security.bcrypt_cost)?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        email,
        phone: req.phone.clone(),
        password_hash,
        role: "user".to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
    };

    state.user_repo.create(&user).await?;

    let tokens = issue_token_pair(&state, &user)?;

    tracing::info!(user_id = %user.id, email = %user.email, "User registered successfully");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "Registration successful".to_string(),
            data: AuthData {
                user: UserInfo::from(user),
                tokens,
            },
        }),
    ))
}

/// Handler for GET /api/v1/auth/profile
///
/// Echoes the claims embedded in the verified access token; no store read.
pub async fn profile(user: AuthUser) -> Result<Json<ProfileResponse>> {
    Ok(Json(ProfileResponse {
        success: true,
        message: "Profile retrieved successfully".to_string(),
        data: ProfileData {
            id: user.id,
            email: user.email,
            role: user.role,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::test_support::test_state;

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Ana Silva".to_string(),
            email: email.to_string(),
            phone: "(11) 91234-5678".to_string(),
            password: "Secreta123".to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let state = test_state().await;

        let response = register(State(state.clone()), Json(register_request("ana@example.com")))
            .await
            .unwrap()
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = login(
            State(state),
            Json(LoginRequest {
                email: "ana@example.com".to_string(),
                password: "Secreta123".to_string(),
            }),
        )
        .await
        .unwrap()
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_submission() {
        let state = test_state().await;

        let mut req = register_request("not-an-email");
        req.password = "weak".to_string();

        let err = register(State(state), Json(req)).await.unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                assert!(errors.contains(&"Invalid email format".to_string()));
                assert!(errors
                    .contains(&"Password must be at least 8 characters long".to_string()));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_email_conflicts() {
        let state = test_state().await;

        register(State(state.clone()), Json(register_request("ana@example.com")))
            .await
            .unwrap();

        // Case differences do not bypass the duplicate check
        let err = register(State(state), Json(register_request("ANA@EXAMPLE.COM")))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_login_unknown_email_is_generic() {
        let state = test_state().await;

        let err = login(
            State(state),
            Json(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "Secreta123".to_string(),
            }),
        )
        .await
        .unwrap_err();

        match err {
            ApiError::Authentication(msg) => assert_eq!(msg, "Invalid credentials"),
            other => panic!("expected authentication error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_login_wrong_password_is_generic() {
        let state = test_state().await;

        register(State(state.clone()), Json(register_request("ana@example.com")))
            .await
            .unwrap();

        let err = login(
            State(state),
            Json(LoginRequest {
                email: "ana@example.com".to_string(),
                password: "Errada456".to_string(),
            }),
        )
        .await
        .unwrap_err();

        match err {
            ApiError::Authentication(msg) => assert_eq!(msg, "Invalid credentials"),
            other => panic!("expected authentication error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_registration_response_excludes_password_hash() {
        let state = test_state().await;

        let response = register(State(state), Json(register_request("ana@example.com")))
            .await
            .unwrap()
            .into_response();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json["success"], true);
        assert!(json["data"]["user"].get("password_hash").is_none());
        assert!(json["data"]["tokens"]["accessToken"].is_string());
        assert!(json["data"]["tokens"]["refreshToken"].is_string());
        assert_eq!(json["data"]["user"]["role"], "user");
    }
}
