//! Request tracing
//!
//! Assigns each request a UUID trace id, wraps the request in a tracing span
//! carrying it, and returns it in the `X-Trace-Id` response header so a log
//! line can be matched to the response a client saw.

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::{info_span, Instrument};
use uuid::Uuid;

pub const TRACE_ID_HEADER: &str = "X-Trace-Id";

/// Request-scoped trace id, available to handlers via extensions
#[derive(Clone, Debug)]
pub struct TraceId(pub String);

impl TraceId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Middleware assigning a trace id and logging request start/completion
pub async fn trace_requests(mut request: Request, next: Next) -> Response {
    let trace_id = Uuid::new_v4().to_string();

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %request.method(),
        uri = %request.uri(),
    );

    request.extensions_mut().insert(TraceId(trace_id.clone()));

    let mut response = async {
        tracing::info!("Request started");
        let response = next.run(request).await;
        tracing::info!(status = %response.status(), "Request completed");
        response
    }
    .instrument(span)
    .await;

    response.headers_mut().insert(
        TRACE_ID_HEADER,
        HeaderValue::from_str(&trace_id).unwrap_or_else(|_| HeaderValue::from_static("invalid")),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::util::ServiceExt;

    fn test_app() -> Router {
        Router::new()
            .route("/test", get(|| async { "OK" }))
            .layer(middleware::from_fn(trace_requests))
    }

    #[tokio::test]
    async fn test_response_carries_valid_trace_id() {
        let response = test_app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let trace_id = response.headers().get(TRACE_ID_HEADER).unwrap();
        assert!(Uuid::parse_str(trace_id.to_str().unwrap()).is_ok());
    }

    #[tokio::test]
    async fn test_trace_ids_are_unique_per_request() {
        let app = test_app();

        let mut seen = Vec::new();
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(
                    axum::http::Request::builder()
                        .uri("/test")
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            seen.push(
                response
                    .headers()
                    .get(TRACE_ID_HEADER)
                    .unwrap()
                    .to_str()
                    .unwrap()
                    .to_string(),
            );
        }

        assert_ne!(seen[0], seen[1]);
    }
}
