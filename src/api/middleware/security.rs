//! Security response headers
//!
//! Adds the standard hardening headers to every response. HSTS is only sent
//! when enabled in the security configuration, since it is wrong to emit it
//! over plain HTTP in development.

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; script-src 'self'; \
    style-src 'self' 'unsafe-inline'; img-src 'self' data: https:; \
    connect-src 'self'; object-src 'none'; frame-ancestors 'none'";

/// Subset of the security configuration the header middleware needs
#[derive(Clone, Debug)]
pub struct SecurityHeaders {
    pub enable_hsts: bool,
    pub hsts_max_age: u64,
}

impl SecurityHeaders {
    pub fn new(enable_hsts: bool, hsts_max_age: u64) -> Self {
        Self {
            enable_hsts,
            hsts_max_age,
        }
    }
}

/// Middleware adding security headers to every response
pub async fn security_headers(
    State(config): State<SecurityHeaders>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "X-XSS-Protection",
        HeaderValue::from_static("1; mode=block"),
    );
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static(CONTENT_SECURITY_POLICY),
    );

    if config.enable_hsts {
        let value = format!("max-age={}; includeSubDomains", config.hsts_max_age);
        headers.insert(
            "Strict-Transport-Security",
            HeaderValue::from_str(&value).unwrap_or_else(|_| {
                HeaderValue::from_static("max-age=31536000; includeSubDomains")
            }),
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::util::ServiceExt;

    fn test_app(config: SecurityHeaders) -> Router {
        Router::new()
            .route("/test", get(|| async { "OK" }))
            .layer(middleware::from_fn_with_state(config, security_headers))
    }

    #[tokio::test]
    async fn test_baseline_headers_always_present() {
        let app = test_app(SecurityHeaders::new(false, 0));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get("X-Content-Type-Options").unwrap(),
            "nosniff"
        );
        assert_eq!(response.headers().get("X-Frame-Options").unwrap(), "DENY");
        assert!(response.headers().contains_key("Content-Security-Policy"));
        assert!(!response.headers().contains_key("Strict-Transport-Security"));
    }

    #[tokio::test]
    async fn test_hsts_emitted_when_enabled() {
        let app = test_app(SecurityHeaders::new(true, 86_400));
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let hsts = response
            .headers()
            .get("Strict-Transport-Security")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(hsts.contains("max-age=86400"));
        assert!(hsts.contains("includeSubDomains"));
    }
}
