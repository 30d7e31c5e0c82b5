//! API routes

use crate::api::handlers::{api_index, health_check, list_proposals, AppState};
use crate::auth::handlers::{login, profile, register};
use crate::auth::middleware::authenticate;
use axum::{
    http::{StatusCode, Uri},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

/// Build the API routes
pub fn build_api_routes(state: AppState) -> Router {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/v1", get(api_index))
        .route("/api/v1/health", get(health_check))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/register", post(register));

    // Protected routes (valid access token required)
    let protected_routes = Router::new()
        .route("/api/v1/auth/profile", get(profile))
        .route("/api/v1/proposals", get(list_proposals))
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(not_found)
        .with_state(state)
}

/// Fallback handler pointing clients at the API index
async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "path": uri.path(),
            "message": "Check /api/v1 for available endpoints",
        })),
    )
}
