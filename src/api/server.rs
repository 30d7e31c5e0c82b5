//! HTTP server
//!
//! Assembles the router with its global middleware stack (rate limiting,
//! security headers, trace ids, CORS, body size limit, request timeout) and
//! serves it with graceful shutdown on Ctrl+C or SIGTERM.

use crate::api::handlers::AppState;
use crate::api::middleware::{rate_limit, security_headers, trace_requests, RateLimiter, SecurityHeaders};
use crate::api::routes::build_api_routes;
use crate::cache::CacheClient;
use crate::core::Config;
use crate::core::config::ServerConfig;
use crate::db::manager::DatabaseManager;
use crate::db::repository::UserRepository;
use axum::{extract::DefaultBodyLimit, middleware, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// How often idle entries are purged from the rate limiter
const RATE_LIMITER_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// HTTP API server
pub struct ApiServer {
    router: Router,
    config: ServerConfig,
}

impl ApiServer {
    /// Create a new API server with the given configuration, database, and
    /// optional cache connection
    pub fn new(config: Config, db: Arc<DatabaseManager>, cache: Option<CacheClient>) -> Self {
        let server_config = config.server.clone();
        let router = Self::build_router(config, db, cache);

        Self {
            router,
            config: server_config,
        }
    }

    fn build_router(config: Config, db: Arc<DatabaseManager>, cache: Option<CacheClient>) -> Router {
        let state = AppState {
            user_repo: Arc::new(UserRepository::new(db.clone())),
            db,
            cache,
            security: Arc::new(config.security.clone()),
            environment: config.server.environment.clone(),
            started_at: Instant::now(),
        };

        let limiter = RateLimiter::new(
            config.security.rate_limit_requests,
            config.security.rate_limit_window,
        );
        Self::spawn_limiter_cleanup(limiter.clone());

        let headers = SecurityHeaders::new(
            config.security.enable_hsts,
            config.security.hsts_max_age,
        );

        build_api_routes(state).layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn_with_state(headers, security_headers))
                .layer(middleware::from_fn(trace_requests))
                .layer(TraceLayer::new_for_http())
                .layer(Self::build_cors_layer(&config.security.allowed_origins))
                .layer(middleware::from_fn_with_state(limiter, rate_limit))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout,
                )))
                .layer(DefaultBodyLimit::max(config.server.max_body_size)),
        )
    }

    fn spawn_limiter_cleanup(limiter: RateLimiter) {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(RATE_LIMITER_CLEANUP_INTERVAL);
            loop {
                interval.tick().await;
                limiter.cleanup_expired().await;
            }
        });
    }

    /// Build CORS layer from allowed origins configuration
    fn build_cors_layer(allowed_origins: &[String]) -> CorsLayer {
        use tower_http::cors::Any;

        let cors = CorsLayer::new();

        if allowed_origins.iter().any(|origin| origin == "*") {
            cors.allow_origin(Any).allow_methods(Any).allow_headers(Any)
        } else {
            let origins: Vec<_> = allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            cors.allow_origin(origins).allow_methods(Any).allow_headers(Any)
        }
    }

    /// Start the HTTP server and block until it is shut down gracefully
    pub async fn serve(self) -> anyhow::Result<()> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let socket_addr: SocketAddr = addr.parse()?;

        info!(
            host = %self.config.host,
            port = self.config.port,
            environment = %self.config.environment,
            "Starting HTTP server"
        );

        let listener = tokio::net::TcpListener::bind(socket_addr).await?;

        info!(addr = %socket_addr, "HTTP server listening");

        axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        info!("HTTP server shut down gracefully");

        Ok(())
    }

    /// Get a reference to the router
    pub fn router(&self) -> &Router {
        &self.router
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received SIGTERM signal");
        },
    }

    info!("Initiating graceful shutdown...");
}
