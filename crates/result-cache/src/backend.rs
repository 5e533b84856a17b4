//! Storage backends for the result cache

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Backend failures. Never leave this crate: `ResultCache` logs them and degrades
/// to a miss or no-op.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache backend error: {0}")]
    Backend(String),

    #[error("Cache operation timed out after {0}ms")]
    Timeout(u64),

    #[error("Cache payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[cfg(feature = "distributed")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

/// Key/value store with per-entry TTL
///
/// Values are serialized envelopes; keys are already namespaced as `prefix:hash`.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Backend name reported in stats
    fn name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Returns true if an entry was removed
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    /// Remove every key in the `prefix:` namespace, returning how many were removed
    async fn clear_prefix(&self, prefix: &str) -> Result<usize, CacheError>;

    /// Sweep expired entries; backends with native expiry return 0
    async fn cleanup_expired(&self) -> Result<usize, CacheError>;
}
