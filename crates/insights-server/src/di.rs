//! Dependency injection module using Shaku.
//!
//! `InsightsModule` wires the whole service into one process: the MySQL pool
//! and repositories, the Redis cache, the LinkedIn and chat-completion
//! clients, and the four services on top of them.

use deadpool_redis::{PoolConfig, Runtime};
use insights_config::{AppConfig, CacheConfig};
use insights_core::{InsightsError, InsightsResult};
use insights_repository::{
    DatabasePool, DatabasePoolInterface, DatabasePoolParameters, MySqlCommentRepository,
    MySqlEmployeeRepository, MySqlPageRepository, MySqlPostRepository,
};
use insights_service::ai::OpenAiClient;
use insights_service::source::LinkedInClient;
use insights_service::{
    CacheInterface, InsightService, InsightServiceComponent, InsightServiceComponentParameters,
    PageService, PageServiceComponent, PageServiceComponentParameters, PostService,
    PostServiceComponent, PostServiceComponentParameters, RedisCacheService,
    RedisCacheServiceParameters, SyncService, SyncServiceComponent,
    SyncServiceComponentParameters,
};
use shaku::{module, HasComponent};
use std::sync::Arc;
use tracing::{info, warn};

module! {
    pub InsightsModule {
        components = [
            DatabasePool,
            MySqlPageRepository,
            MySqlPostRepository,
            MySqlCommentRepository,
            MySqlEmployeeRepository,
            RedisCacheService,
            LinkedInClient,
            OpenAiClient,
            SyncServiceComponent,
            PageServiceComponent,
            PostServiceComponent,
            InsightServiceComponent,
        ],
        providers = [],
    }
}

/// Creates the Redis pool, or `None` when caching is disabled.
fn build_cache_pool(config: &CacheConfig) -> InsightsResult<Option<Arc<deadpool_redis::Pool>>> {
    if !config.enabled {
        warn!("Redis cache disabled; every read goes to MySQL");
        return Ok(None);
    }

    let mut redis_cfg = deadpool_redis::Config::from_url(&config.url);
    redis_cfg.pool = Some(PoolConfig::new(config.pool_size as usize));
    let pool = redis_cfg
        .create_pool(Some(Runtime::Tokio1))
        .map_err(|e| InsightsError::Cache(format!("Failed to create Redis pool: {e}")))?;

    info!("Redis cache pool created");
    Ok(Some(Arc::new(pool)))
}

/// Builds the application module from configuration.
///
/// Connects to MySQL eagerly. Redis connections are made lazily by the pool,
/// so an unreachable Redis shows up in `/health` instead of failing startup.
pub async fn build_module(config: &AppConfig) -> InsightsResult<Arc<InsightsModule>> {
    let db_pool = DatabasePool::new(&config.database).await?;
    let cache_pool = build_cache_pool(&config.cache)?;

    if !config.ai.is_configured() {
        warn!("No AI API key configured; summaries use the statistics fallback");
    }

    let module = InsightsModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.inner().clone(),
        })
        .with_component_parameters::<RedisCacheService>(RedisCacheServiceParameters {
            pool: cache_pool,
            key_prefix: config.cache.key_prefix.clone(),
        })
        .with_component_parameters::<LinkedInClient>(
            LinkedInClient::new(config.linkedin.clone())?.into(),
        )
        .with_component_parameters::<OpenAiClient>(OpenAiClient::new(config.ai.clone())?.into())
        .with_component_parameters::<SyncServiceComponent>(SyncServiceComponentParameters {
            limits: config.linkedin.clone(),
        })
        .with_component_parameters::<PageServiceComponent>(PageServiceComponentParameters {
            cache_config: config.cache.clone(),
        })
        .with_component_parameters::<PostServiceComponent>(PostServiceComponentParameters {
            cache_config: config.cache.clone(),
        })
        .with_component_parameters::<InsightServiceComponent>(InsightServiceComponentParameters {
            ai_config: config.ai.clone(),
            cache_config: config.cache.clone(),
        })
        .build();

    Ok(Arc::new(module))
}

/// Resolves the components the server needs outside the router.
pub trait InfrastructureResolver {
    /// Resolves the database pool from the module.
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;

    /// Resolves the cache from the module.
    fn cache(&self) -> Arc<dyn CacheInterface>;
}

impl InfrastructureResolver for InsightsModule {
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }

    fn cache(&self) -> Arc<dyn CacheInterface> {
        self.resolve()
    }
}
