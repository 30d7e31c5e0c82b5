//! Optional cache-layer connection
//!
//! The cache is configured by URL and is not required for any auth flow in
//! this service; it exists as an injected dependency with a documented
//! lifecycle (connected at startup, dropped at shutdown) and is surfaced
//! through the health endpoint.

use crate::core::error::{ApiError, Result};
use redis::aio::ConnectionManager;
use serde::{Deserialize, Serialize};

/// Connectivity status reported by the health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheStatus {
    Connected,
    Error,
    NotConfigured,
}

/// Async cache client backed by a shared connection manager
#[derive(Clone)]
pub struct CacheClient {
    manager: ConnectionManager,
}

impl CacheClient {
    /// Connect to the cache at the given URL
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| ApiError::Cache(format!("Invalid cache URL: {}", e)))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| ApiError::Cache(format!("Failed to connect to cache: {}", e)))?;

        Ok(Self { manager })
    }

    /// Ping the cache to confirm it is reachable
    pub async fn ping(&self) -> Result<()> {
        let mut conn = self.manager.clone();
        redis::cmd("PING")
            .query_async::<_, String>(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| ApiError::Cache(format!("Cache ping failed: {}", e)))
    }

    /// Status as reported by the health endpoint
    pub async fn status(&self) -> CacheStatus {
        match self.ping().await {
            Ok(()) => CacheStatus::Connected,
            Err(_) => CacheStatus::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_status_serialization() {
        assert_eq!(
            serde_json::to_string(&CacheStatus::Connected).unwrap(),
            "\"connected\""
        );
        assert_eq!(
            serde_json::to_string(&CacheStatus::NotConfigured).unwrap(),
            "\"not_configured\""
        );
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let result = CacheClient::connect("not-a-url").await;
        assert!(matches!(result, Err(ApiError::Cache(_))));
    }
}
