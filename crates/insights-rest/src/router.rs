//! Main application router.

use crate::{
    controllers::{ai_controller, health_controller, page_controller, post_controller},
    middleware::logging_middleware,
    openapi::ApiDoc,
    state::AppState,
};
use axum::{http::HeaderValue, middleware, Router};
use insights_config::{AppConfig, ServerConfig};
use insights_repository::DatabasePoolInterface;
use insights_service::{CacheInterface, InsightService, PageService, PostService};
use metrics_exporter_prometheus::PrometheusHandle;
use shaku::{HasComponent, Module};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the main application router from a Shaku module.
///
/// The module must provide the three services plus the database pool and
/// cache used by the health probes.
pub fn create_router_from_module<M>(
    module: &M,
    config: &AppConfig,
    metrics: Option<PrometheusHandle>,
) -> Router
where
    M: Module
        + HasComponent<dyn PageService>
        + HasComponent<dyn PostService>
        + HasComponent<dyn InsightService>
        + HasComponent<dyn DatabasePoolInterface>
        + HasComponent<dyn CacheInterface>,
{
    let mut state = AppState::from_module(module, config);
    if let Some(handle) = metrics {
        state = state.with_metrics(handle);
    }
    create_router(state, &config.server)
}

/// Creates the main application router from a prepared state.
pub fn create_router(state: AppState, server_config: &ServerConfig) -> Router {
    let request_timeout = TimeoutLayer::new(server_config.request_timeout());
    // Refresh, fetch-if-missing and AI calls wait on outbound APIs.
    let sync_timeout = TimeoutLayer::new(server_config.sync_timeout());

    let pages = page_controller::router()
        .layer(request_timeout.clone())
        .merge(page_controller::sync_router().layer(sync_timeout.clone()));

    let api_router = Router::new()
        .nest("/pages", pages)
        .nest("/posts", post_controller::router().layer(request_timeout.clone()))
        .nest("/ai", ai_controller::router().layer(sync_timeout));

    let router = Router::new()
        // Root, health and metrics
        .merge(health_controller::router().layer(request_timeout))
        // API v1
        .nest("/api/v1", api_router)
        .with_state(state)
        // Swagger UI and OpenAPI spec
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(logging_middleware))
        .layer(CompressionLayer::new())
        .layer(create_cors_layer(server_config))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if server_config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
