//! Authentication middleware
//!
//! The gate used by every protected route: a missing or malformed
//! Authorization header is a 401, a token that fails signature or expiry
//! checks is a 403. On success the verified claims are stored in the request
//! extensions for handlers to extract.

use crate::auth::jwt::verify_access_token;
use crate::core::error::{ApiError, Result};
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Authenticated identity extracted from a verified access token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

/// Authentication middleware for protected routes
pub async fn authenticate(
    State(state): State<crate::api::handlers::AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    // Only the Authorization header in `Bearer <token>` form is accepted
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.to_string());

    let token = match token {
        Some(t) => t,
        None => {
            return ApiError::Authentication("Access token required".to_string()).into_response();
        }
    };

    let claims = match verify_access_token(&token, &state.security.jwt_secret) {
        Ok(c) => c,
        Err(e) => return e.into_response(),
    };

    // The claims are the sole authorization proof; no store read here.
    request.extensions_mut().insert(AuthUser {
        id: claims.user_id,
        email: claims.email,
        role: claims.role,
    });

    next.run(request).await
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::Authentication("Access token required".to_string()))
    }
}
