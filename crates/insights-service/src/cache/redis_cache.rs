//! Redis-based cache implementation.

use super::CacheInterface;
use crate::metrics::ServiceMetrics;
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Pool};
use insights_core::{InsightsError, InsightsResult};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default namespace for keys.
pub const DEFAULT_KEY_PREFIX: &str = "insights";

const SCAN_BATCH: usize = 200;

/// Redis-based cache service.
///
/// Without a pool every operation is a no-op, so a missing Redis degrades to
/// "no cache" instead of failing requests.
#[derive(Component)]
#[shaku(interface = CacheInterface)]
pub struct RedisCacheService {
    pool: Option<Arc<Pool>>,
    #[shaku(default = String::from(DEFAULT_KEY_PREFIX))]
    key_prefix: String,
}

impl RedisCacheService {
    /// Create a new Redis cache service.
    #[must_use]
    pub fn new(pool: Arc<Pool>, key_prefix: impl Into<String>) -> Self {
        Self {
            pool: Some(pool),
            key_prefix: key_prefix.into(),
        }
    }

    /// Create a no-op cache service (for when Redis is disabled).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            pool: None,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }

    fn namespaced(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }

    async fn get_conn(&self) -> InsightsResult<deadpool_redis::Connection> {
        match &self.pool {
            Some(pool) => pool.get().await.map_err(|e| {
                InsightsError::Cache(format!("Failed to get Redis connection: {e}"))
            }),
            None => Err(InsightsError::Cache("Cache is disabled".to_string())),
        }
    }
}

#[async_trait]
impl CacheInterface for RedisCacheService {
    fn is_enabled(&self) -> bool {
        self.pool.is_some()
    }

    async fn get_raw(&self, key: &str) -> InsightsResult<Option<String>> {
        if !self.is_enabled() {
            return Ok(None);
        }

        let key = self.namespaced(key);
        let mut conn = self.get_conn().await?;
        let value: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| InsightsError::Cache(format!("Failed to get key '{key}': {e}")))?;

        if value.is_some() {
            debug!("Cache hit for key '{}'", key);
            ServiceMetrics::cache_hit();
        } else {
            debug!("Cache miss for key '{}'", key);
            ServiceMetrics::cache_miss();
        }

        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> InsightsResult<()> {
        if !self.is_enabled() {
            return Ok(());
        }

        let key = self.namespaced(key);
        let mut conn = self.get_conn().await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(&key, value, ttl_secs)
            .await
            .map_err(|e| InsightsError::Cache(format!("Failed to set key '{key}': {e}")))?;

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn delete(&self, key: &str) -> InsightsResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let key = self.namespaced(key);
        let mut conn = self.get_conn().await?;
        let deleted: i64 = conn
            .del(&key)
            .await
            .map_err(|e| InsightsError::Cache(format!("Failed to delete key '{key}': {e}")))?;

        Ok(deleted > 0)
    }

    async fn exists(&self, key: &str) -> InsightsResult<bool> {
        if !self.is_enabled() {
            return Ok(false);
        }

        let key = self.namespaced(key);
        let mut conn = self.get_conn().await?;
        let exists: bool = conn
            .exists(&key)
            .await
            .map_err(|e| InsightsError::Cache(format!("Failed to check key '{key}': {e}")))?;

        Ok(exists)
    }

    async fn delete_pattern(&self, pattern: &str) -> InsightsResult<u64> {
        if !self.is_enabled() {
            return Ok(0);
        }

        let pattern = self.namespaced(pattern);
        let mut conn = self.get_conn().await?;

        let mut keys = Vec::new();
        let mut cursor: u64 = 0;
        loop {
            let (next, batch): (u64, Vec<String>) = deadpool_redis::redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await
                .map_err(|e| InsightsError::Cache(format!("Failed to scan keys: {e}")))?;
            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: u64 = conn
            .del(&keys)
            .await
            .map_err(|e| InsightsError::Cache(format!("Failed to delete keys: {e}")))?;

        debug!("Deleted {} keys matching pattern '{}'", deleted, pattern);
        Ok(deleted)
    }

    async fn ping(&self) -> bool {
        let Ok(mut conn) = self.get_conn().await else {
            return false;
        };
        let pong: Result<String, _> = deadpool_redis::redis::cmd("PING")
            .query_async(&mut conn)
            .await;
        pong.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheExt;

    #[tokio::test]
    async fn test_disabled_cache_is_a_no_op() {
        let cache = RedisCacheService::disabled();
        assert!(!cache.is_enabled());

        cache.set_raw("k", "\"v\"", Duration::from_secs(60)).await.unwrap();
        assert_eq!(cache.get_raw("k").await.unwrap(), None);
        assert!(!cache.delete("k").await.unwrap());
        assert!(!cache.exists("k").await.unwrap());
        assert_eq!(cache.delete_pattern("*").await.unwrap(), 0);
        assert!(!cache.ping().await);
        assert_eq!(cache.lookup::<String>("k").await, None);
    }

    #[test]
    fn test_keys_are_namespaced() {
        let cache = RedisCacheService::disabled();
        assert_eq!(cache.namespaced("page_detail:acme"), "insights:page_detail:acme");
    }
}
