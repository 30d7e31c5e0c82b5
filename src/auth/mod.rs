//! Authentication and authorization
//!
//! Stateless JWT authentication: registration and login issue an
//! access/refresh token pair, and protected routes are gated by middleware
//! that verifies the access token signature and expiry. Passwords are stored
//! as bcrypt hashes only.

pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;
pub mod validate;

pub use middleware::{authenticate, AuthUser};
