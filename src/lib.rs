//! OrçamentosOnline API
//!
//! Backend service for the OrçamentosOnline budget management system:
//! JWT-based authentication, proposal listing, and service health reporting
//! over a REST API.

pub mod api;
pub mod auth;
pub mod cache;
pub mod core;
pub mod db;

// Re-export commonly used types
pub use api::ApiServer;
pub use crate::core::{ApiError, Config, Logger};
pub use db::DatabaseManager;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
