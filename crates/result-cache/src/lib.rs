//! TTL result cache for expensive pipeline stages
//!
//! The cache is a performance optimization, never a correctness dependency:
//! every backend failure or timeout is logged and reported to the caller as a
//! miss (`get`) or a no-op (`set`, `delete`).
//!
//! Backends:
//! - `memory` (always available): tokio `RwLock<HashMap>` with lazy expiry
//! - `redis` (feature `distributed`): native TTL, selected by [`ResultCache::connect`]
//!   when a URL is configured and reachable

pub mod backend;
pub mod memory;
#[cfg(feature = "distributed")]
pub mod redis_backend;

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

pub use backend::{CacheBackend, CacheError};
pub use memory::MemoryBackend;
#[cfg(feature = "distributed")]
pub use redis_backend::RedisBackend;

/// Payload prefix for full document analyses
pub const PREFIX_ANALYSIS: &str = "doc_analysis";
/// Payload prefix for converted templates
pub const PREFIX_TEMPLATE: &str = "template_conv";
/// Payload prefix for metadata-only scans
pub const PREFIX_QUICK_SCAN: &str = "quick_scan";

/// Longest TTL handed to a backend (one year); larger values are clamped
pub const MAX_TTL_MINUTES: u64 = 365 * 24 * 60;

/// Backend selection and timeouts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Distributed cache URL (e.g. `redis://127.0.0.1:6379`); memory when unset
    #[serde(default)]
    pub distributed_url: Option<String>,
    /// Per-operation timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Entry bound for the in-process backend
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_timeout_ms() -> u64 {
    250
}

fn default_max_entries() -> usize {
    memory::DEFAULT_MAX_ENTRIES
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            distributed_url: None,
            timeout_ms: default_timeout_ms(),
            max_entries: default_max_entries(),
        }
    }
}

/// Stored wrapper around every payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub cached_at: DateTime<Utc>,
    pub ttl_minutes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub backend: String,
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub errors: u64,
    pub hit_rate: f64,
}

/// Namespaced cache key: `prefix:sha256(prefix:identifier)`
pub fn cache_key(prefix: &str, identifier: &str) -> String {
    let digest = Sha256::digest(format!("{}:{}", prefix, identifier).as_bytes());
    format!("{}:{}", prefix, hex::encode(digest))
}

/// Shared cache service, safe to use from concurrent tasks
pub struct ResultCache {
    backend: Arc<dyn CacheBackend>,
    timeout: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    sets: AtomicU64,
    deletes: AtomicU64,
    errors: AtomicU64,
}

impl ResultCache {
    pub fn new(backend: Arc<dyn CacheBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            timeout,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            sets: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryBackend::new()),
            Duration::from_millis(default_timeout_ms()),
        )
    }

    /// Build the cache from config, preferring the distributed backend
    ///
    /// Falls back to the in-process backend when no URL is configured, the
    /// connection fails or times out, or distributed support is compiled out.
    pub async fn connect(config: &CacheConfig) -> Self {
        let timeout = Duration::from_millis(config.timeout_ms);
        let memory = || -> Arc<dyn CacheBackend> {
            Arc::new(MemoryBackend::with_capacity(config.max_entries))
        };

        let backend = match config.distributed_url.as_deref() {
            None => memory(),
            Some(url) => match connect_distributed(url, timeout).await {
                Ok(backend) => backend,
                Err(err) => {
                    warn!("Distributed cache unavailable ({}), using in-process cache", err);
                    memory()
                }
            },
        };

        info!("Result cache backend: {}", backend.name());
        Self::new(backend, timeout)
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Fetch and decode a cached payload
    pub async fn get<T: DeserializeOwned>(&self, prefix: &str, identifier: &str) -> Option<T> {
        let key = cache_key(prefix, identifier);
        let raw = match self.guarded("get", self.backend.get(&key)).await {
            Some(Some(raw)) => raw,
            _ => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                return None;
            }
        };

        match serde_json::from_str::<CacheEntry<T>>(&raw) {
            Ok(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit {} ({})", prefix, identifier);
                Some(entry.data)
            }
            Err(err) => {
                // Stale payload shape: treat as a miss and drop it
                warn!("Discarding undecodable cache entry for {}: {}", prefix, err);
                self.errors.fetch_add(1, Ordering::Relaxed);
                self.misses.fetch_add(1, Ordering::Relaxed);
                let _ = self.guarded("delete", self.backend.delete(&key)).await;
                None
            }
        }
    }

    /// Store a payload wrapped in a [`CacheEntry`] envelope
    pub async fn set<T: Serialize>(
        &self,
        prefix: &str,
        identifier: &str,
        value: &T,
        ttl_minutes: u64,
    ) -> bool {
        let entry = CacheEntry {
            data: value,
            cached_at: Utc::now(),
            ttl_minutes,
        };
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("Cannot serialize cache payload for {}: {}", prefix, err);
                self.errors.fetch_add(1, Ordering::Relaxed);
                return false;
            }
        };

        let key = cache_key(prefix, identifier);
        let ttl = Duration::from_secs(ttl_minutes.min(MAX_TTL_MINUTES) * 60);
        let stored = self
            .guarded("set", self.backend.set(&key, raw, ttl))
            .await
            .is_some();
        if stored {
            self.sets.fetch_add(1, Ordering::Relaxed);
        }
        stored
    }

    pub async fn delete(&self, prefix: &str, identifier: &str) -> bool {
        let key = cache_key(prefix, identifier);
        let removed = self
            .guarded("delete", self.backend.delete(&key))
            .await
            .unwrap_or(false);
        if removed {
            self.deletes.fetch_add(1, Ordering::Relaxed);
        }
        removed
    }

    pub async fn clear_prefix(&self, prefix: &str) -> usize {
        let removed = self
            .guarded("clear_prefix", self.backend.clear_prefix(prefix))
            .await
            .unwrap_or(0);
        self.deletes.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    pub async fn cleanup_expired(&self) -> usize {
        self.guarded("cleanup_expired", self.backend.cleanup_expired())
            .await
            .unwrap_or(0)
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let lookups = hits + misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            hits as f64 / lookups as f64
        };

        CacheStats {
            backend: self.backend.name().to_string(),
            hits,
            misses,
            sets: self.sets.load(Ordering::Relaxed),
            deletes: self.deletes.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
            hit_rate,
        }
    }

    /// Run a backend call under the timeout, swallowing failures
    async fn guarded<R>(
        &self,
        operation: &'static str,
        call: impl Future<Output = Result<R, CacheError>>,
    ) -> Option<R> {
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_elapsed) => Err(CacheError::Timeout(self.timeout.as_millis() as u64)),
        };

        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.errors.fetch_add(1, Ordering::Relaxed);
                warn!("Cache {} failed on {} backend: {}", operation, self.backend.name(), err);
                None
            }
        }
    }
}

#[cfg(feature = "distributed")]
async fn connect_distributed(
    url: &str,
    timeout: Duration,
) -> Result<Arc<dyn CacheBackend>, CacheError> {
    match tokio::time::timeout(timeout, RedisBackend::connect(url)).await {
        Ok(Ok(backend)) => Ok(Arc::new(backend)),
        Ok(Err(err)) => Err(err),
        Err(_elapsed) => Err(CacheError::Timeout(timeout.as_millis() as u64)),
    }
}

#[cfg(not(feature = "distributed"))]
async fn connect_distributed(
    _url: &str,
    _timeout: Duration,
) -> Result<Arc<dyn CacheBackend>, CacheError> {
    Err(CacheError::Backend(
        "distributed cache support not compiled in (enable feature `distributed`)".to_string(),
    ))
}
