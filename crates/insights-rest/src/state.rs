//! Application state for Axum handlers.

use insights_config::{AppConfig, PaginationConfig};
use insights_core::HealthCheck;
use insights_repository::{DatabaseHealth, DatabasePoolInterface};
use insights_service::{CacheHealth, CacheInterface, InsightService, PageService, PostService};
use metrics_exporter_prometheus::PrometheusHandle;
use shaku::{HasComponent, Module};
use std::sync::Arc;

/// Name and version reported by the ops endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInfo {
    pub name: String,
    pub version: String,
    pub environment: String,
}

impl From<&AppConfig> for ServiceInfo {
    fn from(config: &AppConfig) -> Self {
        Self {
            name: config.app.name.clone(),
            version: config.app.version.clone(),
            environment: config.app.environment.clone(),
        }
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub page_service: Arc<dyn PageService>,
    pub post_service: Arc<dyn PostService>,
    pub insight_service: Arc<dyn InsightService>,
    pub health_checks: Arc<[Arc<dyn HealthCheck>]>,
    pub pagination: PaginationConfig,
    pub info: ServiceInfo,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(
        page_service: Arc<dyn PageService>,
        post_service: Arc<dyn PostService>,
        insight_service: Arc<dyn InsightService>,
        health_checks: Vec<Arc<dyn HealthCheck>>,
        info: ServiceInfo,
    ) -> Self {
        Self {
            page_service,
            post_service,
            insight_service,
            health_checks: health_checks.into(),
            pagination: PaginationConfig::default(),
            info,
            metrics: None,
        }
    }

    /// Resolves the services and health probes from a Shaku module.
    pub fn from_module<M>(module: &M, config: &AppConfig) -> Self
    where
        M: Module
            + HasComponent<dyn PageService>
            + HasComponent<dyn PostService>
            + HasComponent<dyn InsightService>
            + HasComponent<dyn DatabasePoolInterface>
            + HasComponent<dyn CacheInterface>,
    {
        let database: Arc<dyn DatabasePoolInterface> = module.resolve();
        let cache: Arc<dyn CacheInterface> = module.resolve();
        let health_checks: Vec<Arc<dyn HealthCheck>> = vec![
            Arc::new(DatabaseHealth::new(database)),
            Arc::new(CacheHealth::new(cache)),
        ];

        Self::new(
            module.resolve(),
            module.resolve(),
            module.resolve(),
            health_checks,
            ServiceInfo::from(config),
        )
        .with_pagination(config.pagination.clone())
    }

    /// Sets the list defaults.
    #[must_use]
    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }

    /// Exposes Prometheus metrics at `/metrics`.
    #[must_use]
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("info", &self.info)
            .field("health_checks", &self.health_checks.len())
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}
