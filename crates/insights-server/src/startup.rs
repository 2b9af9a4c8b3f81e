//! Server startup utilities.

use insights_config::AppConfig;
use insights_core::telemetry::{LogFormat, TelemetryConfig};
use insights_core::{InsightsError, InsightsResult};
use insights_service::metrics::register_metrics;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Maps the observability section onto the tracing bootstrap settings.
#[must_use]
pub fn telemetry_config(config: &AppConfig) -> TelemetryConfig {
    let observability = &config.observability;
    TelemetryConfig {
        enabled: observability.tracing_enabled,
        service_name: config.app.name.clone(),
        otlp_endpoint: observability.otlp_endpoint.clone(),
        sampling_ratio: observability.sampling_ratio,
        log_level: observability.log_level.clone(),
        log_format: LogFormat::parse(&observability.log_format),
    }
}

/// Installs the Prometheus recorder when metrics are enabled.
pub fn install_metrics(config: &AppConfig) -> InsightsResult<Option<PrometheusHandle>> {
    if !config.observability.metrics_enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| InsightsError::Internal(format!("Failed to install metrics recorder: {e}")))?;
    register_metrics();

    info!("Prometheus metrics available at /metrics");
    Ok(Some(handle))
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let addr = config.server.addr();
    info!("{}", separator);
    info!("{} v{} ({})", config.app.name, config.app.version, config.app.environment);
    info!("REST API:  http://{}/api/v1", addr);
    info!("Health:    http://{}/health", addr);
    info!("API Docs:  http://{}/swagger-ui", addr);
    info!("{}", separator);
}
