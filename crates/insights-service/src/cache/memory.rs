//! In-process cache used by service tests.

use super::CacheInterface;
use async_trait::async_trait;
use insights_core::{InsightsError, InsightsResult};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Map-backed cache. TTLs are ignored.
#[derive(Default)]
pub(crate) struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
    failing: bool,
}

impl MemoryCache {
    /// A cache whose every operation errors, to exercise degraded paths.
    pub(crate) fn failing() -> Self {
        Self {
            entries: Mutex::default(),
            failing: true,
        }
    }

    pub(crate) fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn guard(&self) -> InsightsResult<()> {
        if self.failing {
            Err(InsightsError::Cache("connection refused".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Glob match supporting `*` only, which is all the key patterns use.
fn glob_match(pattern: &str, key: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == key;
    }
    let mut rest = key;
    for (i, part) in parts.iter().enumerate() {
        if part.is_empty() {
            continue;
        }
        if i == 0 {
            match rest.strip_prefix(part) {
                Some(r) => rest = r,
                None => return false,
            }
        } else if i == parts.len() - 1 {
            return rest.ends_with(part);
        } else {
            match rest.find(part) {
                Some(pos) => rest = &rest[pos + part.len()..],
                None => return false,
            }
        }
    }
    true
}

#[async_trait]
impl CacheInterface for MemoryCache {
    async fn get_raw(&self, key: &str) -> InsightsResult<Option<String>> {
        self.guard()?;
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set_raw(&self, key: &str, value: &str, _ttl: Duration) -> InsightsResult<()> {
        self.guard()?;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> InsightsResult<bool> {
        self.guard()?;
        Ok(self.entries.lock().unwrap().remove(key).is_some())
    }

    async fn exists(&self, key: &str) -> InsightsResult<bool> {
        self.guard()?;
        Ok(self.entries.lock().unwrap().contains_key(key))
    }

    async fn delete_pattern(&self, pattern: &str) -> InsightsResult<u64> {
        self.guard()?;
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|key, _| !glob_match(pattern, key));
        Ok((before - entries.len()) as u64)
    }

    async fn ping(&self) -> bool {
        !self.failing
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{cache_keys, CacheExt};

    #[test]
    fn test_glob_match() {
        assert!(glob_match("*acme*", "page_detail:acme"));
        assert!(glob_match("*acme*", "recent_posts:acme:15"));
        assert!(!glob_match("*acme*", "page_detail:globex"));
        assert!(glob_match("page_*", "page_detail:acme"));
        assert!(glob_match("exact", "exact"));
    }

    #[tokio::test]
    async fn test_invalidate_page_only_touches_that_page() {
        let cache = MemoryCache::default();
        cache.store(&cache_keys::page_detail("acme"), &1, Duration::from_secs(1)).await;
        cache.store(&cache_keys::recent_posts("acme", 15), &2, Duration::from_secs(1)).await;
        cache.store(&cache_keys::page_detail("globex"), &3, Duration::from_secs(1)).await;

        assert_eq!(cache.invalidate_page("acme").await, 2);
        assert_eq!(cache.keys(), vec!["page_detail:globex".to_string()]);
    }

    #[tokio::test]
    async fn test_failing_cache_reads_as_miss() {
        let cache = MemoryCache::failing();
        cache.store("k", &1, Duration::from_secs(1)).await;
        assert_eq!(cache.lookup::<i32>("k").await, None);
        assert_eq!(cache.invalidate_page("acme").await, 0);
    }
}
