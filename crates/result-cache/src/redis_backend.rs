//! Distributed backend on Redis
//!
//! Relies on native `EX` expiry; `cleanup_expired` is a no-op.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tracing::debug;

use crate::backend::{CacheBackend, CacheError};

const SCAN_BATCH: usize = 200;

pub struct RedisBackend {
    connection: MultiplexedConnection,
}

impl RedisBackend {
    /// Open a multiplexed connection and verify it with `PING`
    pub async fn connect(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let mut connection = client.get_multiplexed_async_connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut connection).await?;
        debug!("Connected to distributed cache");
        Ok(Self { connection })
    }
}

#[async_trait]
impl CacheBackend for RedisBackend {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut con = self.connection.clone();
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut con).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut con = self.connection.clone();
        let seconds = ttl.as_secs().max(1);
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(seconds)
            .query_async(&mut con)
            .await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut con = self.connection.clone();
        let removed: usize = redis::cmd("DEL").arg(key).query_async(&mut con).await?;
        Ok(removed > 0)
    }

    async fn clear_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let mut con = self.connection.clone();
        let pattern = format!("{}:*", prefix);
        let mut cursor: u64 = 0;
        let mut total = 0;

        loop {
            let (next, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut con)
                .await?;

            if !keys.is_empty() {
                let removed: usize = redis::cmd("DEL").arg(&keys).query_async(&mut con).await?;
                total += removed;
            }

            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(total)
    }

    async fn cleanup_expired(&self) -> Result<usize, CacheError> {
        Ok(0)
    }
}
