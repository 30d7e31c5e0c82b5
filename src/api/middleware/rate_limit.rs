//! Per-IP rate limiting
//!
//! Sliding-window limiter: each client IP keeps the timestamps of its
//! requests inside the configured window; once the window is full, further
//! requests get a 429 with a Retry-After header indicating when the oldest
//! recorded request falls out of the window.

use crate::core::error::ApiError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct RateLimiter {
    requests: Arc<RwLock<HashMap<IpAddr, Vec<Instant>>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window_seconds: u64) -> Self {
        Self {
            requests: Arc::new(RwLock::new(HashMap::new())),
            max_requests,
            window: Duration::from_secs(window_seconds),
        }
    }

    /// Record a request from the given IP. Returns `Err(retry_after_secs)`
    /// when the window is already full.
    pub async fn check(&self, ip: IpAddr) -> Result<(), u64> {
        let mut requests = self.requests.write().await;
        let now = Instant::now();
        let window_start = now - self.window;

        let history = requests.entry(ip).or_default();
        history.retain(|&t| t > window_start);

        if history.len() >= self.max_requests {
            let retry_after = history
                .first()
                .map(|&oldest| oldest.duration_since(window_start).as_secs().max(1))
                .unwrap_or(1);
            return Err(retry_after);
        }

        history.push(now);
        Ok(())
    }

    /// Drop IPs whose whole history has aged out of the window. Called
    /// periodically so idle clients do not accumulate.
    pub async fn cleanup_expired(&self) {
        let mut requests = self.requests.write().await;
        let window_start = Instant::now() - self.window;
        requests.retain(|_, history| {
            history.retain(|&t| t > window_start);
            !history.is_empty()
        });
    }
}

/// Rate limiting middleware, applied ahead of routing
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let ip = client_ip(&request);

    match limiter.check(ip).await {
        Ok(()) => next.run(request).await,
        Err(retry_after) => {
            tracing::warn!(ip = %ip, retry_after, "Rate limit exceeded");
            let mut response = ApiError::RateLimited.into_response();
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from_str(&retry_after.to_string())
                    .unwrap_or_else(|_| HeaderValue::from_static("60")),
            );
            response
        }
    }
}

/// Best-effort client IP: proxy headers first, then the socket address.
fn client_ip(request: &Request) -> IpAddr {
    if let Some(forwarded) = request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.split(',').next())
        .and_then(|ip| ip.trim().parse::<IpAddr>().ok())
    {
        return forwarded;
    }

    if let Some(real_ip) = request
        .headers()
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
        .and_then(|ip| ip.parse::<IpAddr>().ok())
    {
        return real_ip;
    }

    request
        .extensions()
        .get::<axum::extract::ConnectInfo<std::net::SocketAddr>>()
        .map(|info| info.0.ip())
        .unwrap_or(IpAddr::from([127, 0, 0, 1]))
}
