//! In-process backend
//!
//! Expired entries are swept lazily: on read, or by an explicit `cleanup_expired`.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::backend::{CacheBackend, CacheError};

/// Default upper bound on stored entries
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Expiry used when `now + ttl` is not representable
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone)]
struct StoredEntry {
    value: String,
    expires_at: Instant,
}

/// TTL-bounded map guarded by a tokio `RwLock`
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, StoredEntry>>,
    max_entries: usize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Bounded store; when full, expired entries are swept first and then the entry
    /// closest to expiry is evicted
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn sweep(entries: &mut HashMap<String, StoredEntry>, now: Instant) -> usize {
    let before = entries.len();
    entries.retain(|_, entry| entry.expires_at > now);
    before - entries.len()
}

#[async_trait]
impl CacheBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return Ok(None),
                Some(entry) if entry.expires_at > now => return Ok(Some(entry.value.clone())),
                Some(_) => {}
            }
        }

        // Expired: drop it under the write lock, rechecking in case it was rewritten
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|entry| entry.expires_at <= now) {
            entries.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        if !entries.contains_key(key) && entries.len() >= self.max_entries {
            sweep(&mut entries, now);
            if entries.len() >= self.max_entries {
                let victim = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.expires_at)
                    .map(|(k, _)| k.clone());
                if let Some(victim) = victim {
                    entries.remove(&victim);
                }
            }
        }

        entries.insert(
            key.to_string(),
            StoredEntry {
                value,
                expires_at: now
                    .checked_add(ttl)
                    .or_else(|| now.checked_add(FAR_FUTURE))
                    .unwrap_or(now),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn clear_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let namespace = format!("{}:", prefix);
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(&namespace));
        Ok(before - entries.len())
    }

    async fn cleanup_expired(&self) -> Result<usize, CacheError> {
        let mut entries = self.entries.write().await;
        Ok(sweep(&mut entries, Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_swept_on_read() {
        let backend = MemoryBackend::new();
        backend
            .set("doc_analysis:abc", "payload".into(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(
            backend.get("doc_analysis:abc").await.unwrap().as_deref(),
            Some("payload")
        );

        tokio::time::advance(Duration::from_secs(61)).await;

        assert_eq!(backend.get("doc_analysis:abc").await.unwrap(), None);
        assert!(backend.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_expired_counts_removed_entries() {
        let backend = MemoryBackend::new();
        backend.set("a:1", "x".into(), Duration::from_secs(10)).await.unwrap();
        backend.set("a:2", "y".into(), Duration::from_secs(10)).await.unwrap();
        backend.set("a:3", "z".into(), Duration::from_secs(600)).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;

        assert_eq!(backend.cleanup_expired().await.unwrap(), 2);
        assert_eq!(backend.len().await, 1);
    }

    #[tokio::test]
    async fn test_unrepresentable_expiry_keeps_entry() {
        let backend = MemoryBackend::new();
        backend.set("a:1", "x".into(), Duration::MAX).await.unwrap();

        assert_eq!(backend.get("a:1").await.unwrap().as_deref(), Some("x"));
        assert_eq!(backend.cleanup_expired().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_clear_prefix_only_touches_namespace() {
        let backend = MemoryBackend::new();
        let ttl = Duration::from_secs(60);
        backend.set("quick_scan:1", "a".into(), ttl).await.unwrap();
        backend.set("quick_scan:2", "b".into(), ttl).await.unwrap();
        backend.set("quick_scanner:3", "c".into(), ttl).await.unwrap();
        backend.set("template_conv:1", "d".into(), ttl).await.unwrap();

        assert_eq!(backend.clear_prefix("quick_scan").await.unwrap(), 2);
        assert_eq!(backend.len().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_full_store_evicts_entry_closest_to_expiry() {
        let backend = MemoryBackend::with_capacity(2);
        backend.set("p:short", "1".into(), Duration::from_secs(5)).await.unwrap();
        backend.set("p:long", "2".into(), Duration::from_secs(500)).await.unwrap();
        backend.set("p:new", "3".into(), Duration::from_secs(50)).await.unwrap();

        assert_eq!(backend.get("p:short").await.unwrap(), None);
        assert!(backend.get("p:long").await.unwrap().is_some());
        assert!(backend.get("p:new").await.unwrap().is_some());
    }
}
