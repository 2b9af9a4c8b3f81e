//! Database connection pool management.

use insights_config::DatabaseConfig;
use insights_core::{HealthCheck, HealthStatus, InsightsError, InsightsResult, Interface};
use async_trait::async_trait;
use shaku::Component;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::sync::Arc;
use tracing::{info, warn};

/// Interface for database pool operations.
#[async_trait]
pub trait DatabasePoolInterface: Interface + Send + Sync {
    /// Returns a reference to the underlying MySQL pool.
    fn inner(&self) -> &MySqlPool;

    /// Runs `SELECT 1` against the pool.
    async fn health_check(&self) -> InsightsResult<()>;

    /// Applies pending migrations from `migrations/`.
    async fn run_migrations(&self) -> InsightsResult<()>;

    /// Closes the database pool.
    async fn close(&self);
}

/// Database pool wrapper.
#[derive(Component)]
#[shaku(interface = DatabasePoolInterface)]
pub struct DatabasePool {
    pool: MySqlPool,
}

impl DatabasePool {
    /// Connects a new pool using the given configuration.
    pub async fn new(config: &DatabaseConfig) -> InsightsResult<Self> {
        info!("Connecting to MySQL database...");

        let pool = MySqlPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout())
            .idle_timeout(Some(config.idle_timeout()))
            .connect(&config.url)
            .await
            .map_err(|e| {
                warn!("Failed to connect to database: {}", e);
                InsightsError::Database(format!("Failed to connect: {}", e))
            })?;

        info!("MySQL connection pool established");
        Ok(Self { pool })
    }

    /// Wraps a pre-existing pool (for Shaku injection and tests).
    #[must_use]
    pub fn with_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabasePoolInterface for DatabasePool {
    fn inner(&self) -> &MySqlPool {
        &self.pool
    }

    async fn health_check(&self) -> InsightsResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| InsightsError::Database(format!("Health check failed: {}", e)))?;
        Ok(())
    }

    async fn run_migrations(&self) -> InsightsResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| InsightsError::Database(format!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    async fn close(&self) {
        info!("Closing database connection pool...");
        self.pool.close().await;
        info!("Database connection pool closed");
    }
}

impl std::fmt::Debug for DatabasePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabasePool")
            .field("size", &self.pool.size())
            .field("num_idle", &self.pool.num_idle())
            .finish()
    }
}

/// Health probe running `SELECT 1` through the pool.
pub struct DatabaseHealth {
    pool: Arc<dyn DatabasePoolInterface>,
}

impl DatabaseHealth {
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for DatabaseHealth {
    fn name(&self) -> &str {
        "database"
    }

    async fn check(&self) -> HealthStatus {
        match self.pool.health_check().await {
            Ok(()) => HealthStatus::Healthy,
            Err(e) => {
                warn!("Database health check failed: {}", e);
                HealthStatus::Unhealthy("database unreachable".to_string())
            }
        }
    }
}
