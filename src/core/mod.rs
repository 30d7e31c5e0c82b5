//! Core infrastructure: configuration, errors, and logging.

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{ApiError, Result};
pub use logging::Logger;
