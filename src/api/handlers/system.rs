//! Service-level endpoints: health check and the API index

use crate::cache::CacheStatus;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::AppState;

pub const SERVICE_NAME: &str = "orcamentos-online-api";
pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub success: bool,
    pub status: String,
    pub timestamp: String,
    pub service: String,
    pub version: String,
    pub environment: String,
    pub database: DatabaseHealth,
    pub cache: CacheHealth,
    /// Seconds since the server started
    pub uptime: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DatabaseHealth {
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheHealth {
    pub status: CacheStatus,
}

/// Handler for GET /api/v1/health
///
/// Reports overall service health. The database check runs a trivial query
/// through the pool; a failure there makes the whole service unhealthy. The
/// cache is optional, so its status is informational only.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    if let Err(e) = state.db.check_connectivity().await {
        tracing::error!("Health check failed: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({
                "success": false,
                "status": "unhealthy",
                "timestamp": Utc::now().to_rfc3339(),
                "error": "Database connectivity check failed",
            })),
        )
            .into_response();
    }

    let cache_status = match &state.cache {
        Some(cache) => cache.status().await,
        None => CacheStatus::NotConfigured,
    };

    let response = HealthResponse {
        success: true,
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        service: SERVICE_NAME.to_string(),
        version: API_VERSION.to_string(),
        environment: state.environment.clone(),
        database: DatabaseHealth {
            status: "connected".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        },
        cache: CacheHealth {
            status: cache_status,
        },
        uptime: state.started_at.elapsed().as_secs(),
    };

    Json(response).into_response()
}

/// Handler for GET /api/v1 - endpoint catalogue
pub async fn api_index(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "name": "OrçamentosOnline API",
        "version": API_VERSION,
        "description": "Budget Management System API",
        "environment": state.environment,
        "endpoints": {
            "health": "GET /api/v1/health",
            "auth": {
                "login": "POST /api/v1/auth/login",
                "register": "POST /api/v1/auth/register",
                "profile": "GET /api/v1/auth/profile",
            },
            "proposals": {
                "list": "GET /api/v1/proposals",
            },
        },
        "demo_credentials": {
            "email": "demo@orcamentos.com",
            "password": "demo123",
        },
    }))
}
