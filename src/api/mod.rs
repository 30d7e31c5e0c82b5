//! REST API module
//!
//! This module provides the HTTP server and REST API endpoints including:
//! - API routing and request handling
//! - Rate limiting and security headers
//! - Request tracing
//! - Error handling and response formatting

pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod server;

pub use middleware::{trace_requests, TraceId, TRACE_ID_HEADER};
pub use server::ApiServer;
