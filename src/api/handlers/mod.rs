pub mod proposals;
pub mod system;

pub use proposals::*;
pub use system::*;

use crate::cache::CacheClient;
use crate::core::config::SecurityConfig;
use crate::db::manager::DatabaseManager;
use crate::db::repository::UserRepository;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for handlers
#[derive(Clone)]
pub struct AppState {
    pub user_repo: Arc<UserRepository>,
    pub db: Arc<DatabaseManager>,
    /// Optional; `None` when no cache URL is configured.
    pub cache: Option<CacheClient>,
    pub security: Arc<SecurityConfig>,
    pub environment: String,
    pub started_at: Instant,
}
