//! Tracing subscriber bootstrap with optional OpenTelemetry export.
//!
//! The subscriber always gets an `EnvFilter` (overridable through `RUST_LOG`)
//! and a console layer in either pretty or JSON form. When the `telemetry`
//! feature is enabled and tracing is switched on, spans are also exported over
//! OTLP.

#[cfg(feature = "telemetry")]
use opentelemetry::trace::TracerProvider;
#[cfg(feature = "telemetry")]
use opentelemetry::KeyValue;
#[cfg(feature = "telemetry")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "telemetry")]
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler},
    Resource,
};
#[cfg(feature = "telemetry")]
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;
#[cfg(feature = "telemetry")]
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::InsightsResult;
use serde::{Deserialize, Serialize};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,insights=debug,tower_http=debug";

/// Console output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl LogFormat {
    /// Parses a config value; anything other than `json` is pretty.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pretty
        }
    }
}

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Whether span export is enabled.
    #[serde(default)]
    pub enabled: bool,

    /// Service name for tracing.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// OTLP endpoint URL (e.g., "http://localhost:4317").
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    /// Sampling ratio (0.0 to 1.0).
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,

    /// Base log level used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Console output format.
    #[serde(default)]
    pub log_format: LogFormat,
}

fn default_service_name() -> String {
    "linkedin-insights".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_name: default_service_name(),
            otlp_endpoint: None,
            sampling_ratio: default_sampling_ratio(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
        }
    }
}

impl TelemetryConfig {
    /// Filter directive derived from the configured level.
    #[must_use]
    pub fn filter_directive(&self) -> String {
        if self.log_level.eq_ignore_ascii_case("info") {
            DEFAULT_FILTER.to_string()
        } else {
            format!("{},insights=debug,tower_http=debug", self.log_level.to_lowercase())
        }
    }
}

#[cfg(feature = "telemetry")]
fn console_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    match format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().with_target(true).boxed(),
    }
}

/// Initialize tracing with the given configuration.
#[cfg(feature = "telemetry")]
pub fn init_telemetry(config: &TelemetryConfig) -> InsightsResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.filter_directive()));

    if !config.enabled {
        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer(config.log_format))
            .try_init()
            .map_err(|e| crate::InsightsError::Internal(format!("Failed to init tracing: {e}")))?;
        return Ok(());
    }

    let sampler = if config.sampling_ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if config.sampling_ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(config.sampling_ratio)
    };

    let resource = Resource::new(vec![KeyValue::new(
        SERVICE_NAME,
        config.service_name.clone(),
    )]);

    let builder = opentelemetry_sdk::trace::TracerProvider::builder()
        .with_sampler(sampler)
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource);

    let tracer_provider = if let Some(endpoint) = &config.otlp_endpoint {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()
            .map_err(|e| {
                crate::InsightsError::Internal(format!("Failed to create OTLP exporter: {e}"))
            })?;
        builder.with_batch_exporter(exporter, runtime::Tokio).build()
    } else {
        builder.build()
    };

    let tracer = tracer_provider.tracer("linkedin-insights");
    opentelemetry::global::set_tracer_provider(tracer_provider);

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer(config.log_format))
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init()
        .map_err(|e| crate::InsightsError::Internal(format!("Failed to init tracing: {e}")))?;

    tracing::info!(
        service_name = %config.service_name,
        sampling_ratio = %config.sampling_ratio,
        otlp_endpoint = ?config.otlp_endpoint,
        "Telemetry initialized"
    );

    Ok(())
}

/// Shutdown telemetry, flushing any pending spans.
#[cfg(feature = "telemetry")]
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
    tracing::info!("Telemetry shutdown complete");
}

/// No-op when the telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn init_telemetry(_config: &TelemetryConfig) -> InsightsResult<()> {
    Ok(())
}

/// No-op when the telemetry feature is disabled.
#[cfg(not(feature = "telemetry"))]
pub fn shutdown_telemetry() {}
