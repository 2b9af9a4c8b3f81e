//! Health probe over any cache backend.

use super::CacheInterface;
use async_trait::async_trait;
use insights_core::{HealthCheck, HealthStatus};
use std::sync::Arc;

/// Reports the cache as degraded when disabled and unhealthy when it does
/// not answer a ping.
pub struct CacheHealth {
    cache: Arc<dyn CacheInterface>,
}

impl CacheHealth {
    pub fn new(cache: Arc<dyn CacheInterface>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl HealthCheck for CacheHealth {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        if !self.cache.is_enabled() {
            // Running without Redis is a supported mode.
            return HealthStatus::Degraded("disabled".to_string());
        }
        if self.cache.ping().await {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy("redis unreachable".to_string())
        }
    }
}
