//! Health and operations controller.

use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use insights_core::HealthStatus;
use serde::Serialize;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Creates the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/live", get(liveness_check))
        .route("/metrics", get(metrics))
}

/// Service banner.
#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Result of one dependency probe.
#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    /// healthy, degraded or unhealthy.
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<HealthStatus> for ComponentHealth {
    fn from(status: HealthStatus) -> Self {
        let label = status.label().to_string();
        let message = match status {
            HealthStatus::Healthy => None,
            HealthStatus::Degraded(reason) | HealthStatus::Unhealthy(reason) => Some(reason),
        };
        Self {
            status: label,
            message,
        }
    }
}

/// Detailed health response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Worst status over all checks.
    pub status: String,
    pub service: String,
    pub version: String,
    pub environment: String,
    pub checks: BTreeMap<String, ComponentHealth>,
}

/// Service banner.
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Service is up", body = RootResponse))
)]
pub async fn root(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        status: "healthy".to_string(),
        service: state.info.name.clone(),
        version: state.info.version.clone(),
    })
}

/// Detailed health of the service and its dependencies.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses((status = 200, description = "Health of each dependency", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let results = run_checks(&state).await;

    let status = if results.iter().all(|(_, s)| s.is_healthy()) {
        "healthy"
    } else if results.iter().any(|(_, s)| s.is_unhealthy()) {
        "unhealthy"
    } else {
        "degraded"
    };

    let checks = results
        .into_iter()
        .map(|(name, status)| (name, ComponentHealth::from(status)))
        .collect();

    Json(HealthResponse {
        status: status.to_string(),
        service: state.info.name.clone(),
        version: state.info.version.clone(),
        environment: state.info.environment.clone(),
        checks,
    })
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "health",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "A dependency is unhealthy")
    )
)]
pub async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    let results = run_checks(&state).await;
    if results.iter().any(|(_, status)| status.is_unhealthy()) {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    }
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/live",
    tag = "health",
    responses((status = 200, description = "Service is alive"))
)]
pub async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

/// Prometheus metrics in text exposition format.
#[utoipa::path(
    get,
    path = "/metrics",
    tag = "health",
    responses(
        (status = 200, description = "Prometheus metrics", content_type = "text/plain"),
        (status = 404, description = "Metrics are disabled")
    )
)]
pub async fn metrics(State(state): State<AppState>) -> Response {
    match &state.metrics {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Runs every registered check in order.
async fn run_checks(state: &AppState) -> Vec<(String, HealthStatus)> {
    let mut results = Vec::with_capacity(state.health_checks.len());
    for check in state.health_checks.iter() {
        results.push((check.name().to_string(), check.check().await));
    }
    results
}
