//! Cache interface trait for abstracted caching operations.

use insights_core::InsightsResult;
use async_trait::async_trait;
use shaku::Interface;
use std::time::Duration;
use tracing::warn;

/// Cache interface for storing and retrieving cached data.
///
/// Values are stored as JSON strings so the trait stays dyn-compatible.
/// Keys are given without the deployment prefix; implementations namespace
/// them.
#[async_trait]
pub trait CacheInterface: Interface + Send + Sync {
    /// Get a raw JSON value. `None` if the key is absent or expired.
    async fn get_raw(&self, key: &str) -> InsightsResult<Option<String>>;

    /// Set a raw JSON value with a TTL.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> InsightsResult<()>;

    /// Delete a value. Returns `true` if the key existed.
    async fn delete(&self, key: &str) -> InsightsResult<bool>;

    /// Check if a key exists.
    async fn exists(&self, key: &str) -> InsightsResult<bool>;

    /// Delete every key matching a glob pattern. Returns the number deleted.
    async fn delete_pattern(&self, pattern: &str) -> InsightsResult<u64>;

    /// Round-trips to the backend. `false` when disabled or unreachable.
    async fn ping(&self) -> bool;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;
}

/// Typed helpers over [`CacheInterface`].
#[async_trait]
pub trait CacheExt: CacheInterface {
    /// Get a typed value from the cache.
    async fn get<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> InsightsResult<Option<T>> {
        match self.get_raw(key).await? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Set a typed value in the cache.
    async fn set<T: serde::Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> InsightsResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, &json, ttl).await
    }

    /// Like [`CacheExt::get`], but a cache failure reads as a miss.
    async fn lookup<T: serde::de::DeserializeOwned + Send>(&self, key: &str) -> Option<T> {
        match self.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Cache read for '{}' failed: {}", key, e);
                None
            }
        }
    }

    /// Like [`CacheExt::set`], but a cache failure is only logged.
    async fn store<T: serde::Serialize + Send + Sync>(&self, key: &str, value: &T, ttl: Duration) {
        if let Err(e) = self.set(key, value, ttl).await {
            warn!("Cache write for '{}' failed: {}", key, e);
        }
    }

    /// Drops every cached entry that mentions the page slug.
    async fn invalidate_page(&self, slug: &str) -> u64 {
        match self.delete_pattern(&super::cache_keys::page_pattern(slug)).await {
            Ok(deleted) => deleted,
            Err(e) => {
                warn!("Cache invalidation for page '{}' failed: {}", slug, e);
                0
            }
        }
    }
}

impl<T: CacheInterface + ?Sized> CacheExt for T {}
