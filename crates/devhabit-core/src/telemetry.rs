//! Logging and OpenTelemetry distributed tracing.
//!
//! [`init_telemetry`] installs one global subscriber: an env filter, a fmt
//! layer (JSON or human readable) and, with the `telemetry` feature, an
//! OpenTelemetry layer exporting spans over OTLP.

#[cfg(feature = "telemetry")]
use opentelemetry::{trace::TracerProvider as _, KeyValue};
#[cfg(feature = "telemetry")]
use opentelemetry_otlp::WithExportConfig;
#[cfg(feature = "telemetry")]
use opentelemetry_sdk::{
    runtime,
    trace::{RandomIdGenerator, Sampler, Tracer, TracerProvider},
    Resource,
};
#[cfg(feature = "telemetry")]
use opentelemetry_semantic_conventions::resource::SERVICE_NAME;
#[cfg(feature = "telemetry")]
use tracing_opentelemetry::OpenTelemetryLayer;
#[cfg(feature = "telemetry")]
use tracing_subscriber::registry::LookupSpan;

use crate::{DevHabitError, DevHabitResult};
use serde::{Deserialize, Serialize};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,devhabit=debug,tower_http=debug,sqlx=warn";

/// Telemetry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Whether span export is enabled.
    #[serde(default)]
    pub enabled: bool,

    /// Service name reported on every span.
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// OTLP endpoint URL (e.g., "http://localhost:4317").
    #[serde(default)]
    pub otlp_endpoint: Option<String>,

    /// Sampling ratio (0.0 to 1.0).
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,

    /// Emit log lines as JSON instead of human readable text.
    #[serde(default)]
    pub json_output: bool,

    /// Extra filter directive appended to [`DEFAULT_LOG_FILTER`].
    #[serde(default)]
    pub log_level: Option<String>,
}

fn default_service_name() -> String {
    "devhabit-api".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            service_name: default_service_name(),
            otlp_endpoint: None,
            sampling_ratio: default_sampling_ratio(),
            json_output: false,
            log_level: None,
        }
    }
}

impl TelemetryConfig {
    /// Filter directives used when `RUST_LOG` is absent.
    #[must_use]
    pub fn filter_directives(&self) -> String {
        match self.log_level.as_deref().map(str::trim) {
            Some(level) if !level.is_empty() => format!("{},{}", DEFAULT_LOG_FILTER, level),
            _ => DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over [`TelemetryConfig::log_level`]. Fails when a global
/// subscriber is already set.
pub fn init_telemetry(config: &TelemetryConfig) -> DevHabitResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.filter_directives()))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let fmt_layer = if config.json_output {
        tracing_subscriber::fmt::layer().json().with_target(true).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_target(true).boxed()
    };

    let registry = tracing_subscriber::registry().with(filter).with(fmt_layer);

    #[cfg(feature = "telemetry")]
    let registry = registry.with(otel_layer(config)?);

    registry
        .try_init()
        .map_err(|e| DevHabitError::Configuration(format!("Failed to install subscriber: {}", e)))?;

    tracing::info!(
        service_name = %config.service_name,
        span_export = config.enabled,
        otlp_endpoint = ?config.otlp_endpoint,
        "Telemetry initialized"
    );
    Ok(())
}

#[cfg(feature = "telemetry")]
fn sampler(ratio: f64) -> Sampler {
    if ratio >= 1.0 {
        Sampler::AlwaysOn
    } else if ratio <= 0.0 {
        Sampler::AlwaysOff
    } else {
        Sampler::TraceIdRatioBased(ratio)
    }
}

#[cfg(feature = "telemetry")]
fn otel_layer<S>(config: &TelemetryConfig) -> DevHabitResult<Option<OpenTelemetryLayer<S, Tracer>>>
where
    S: tracing::Subscriber + for<'span> LookupSpan<'span>,
{
    if !config.enabled {
        return Ok(None);
    }

    let builder = TracerProvider::builder()
        .with_sampler(sampler(config.sampling_ratio))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(Resource::new(vec![KeyValue::new(SERVICE_NAME, config.service_name.clone())]));

    let provider = match &config.otlp_endpoint {
        Some(endpoint) => {
            let exporter = opentelemetry_otlp::SpanExporter::builder()
                .with_tonic()
                .with_endpoint(endpoint)
                .build()
                .map_err(|e| DevHabitError::Configuration(format!("Failed to create OTLP exporter: {}", e)))?;
            builder.with_batch_exporter(exporter, runtime::Tokio).build()
        }
        None => builder.build(),
    };

    let tracer = provider.tracer(config.service_name.clone());
    opentelemetry::global::set_tracer_provider(provider);
    Ok(Some(tracing_opentelemetry::layer().with_tracer(tracer)))
}

/// Flushes pending spans.
#[cfg(feature = "telemetry")]
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
    tracing::info!("Telemetry shutdown complete");
}

#[cfg(not(feature = "telemetry"))]
pub fn shutdown_telemetry() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TelemetryConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.service_name, "devhabit-api");
        assert!((config.sampling_ratio - 1.0).abs() < f64::EPSILON);
        assert!(!config.json_output);
    }

    #[test]
    fn test_deserialize_uses_defaults() {
        let config: TelemetryConfig = serde_json::from_str(r#"{"enabled": true}"#).unwrap();
        assert!(config.enabled);
        assert_eq!(config.service_name, "devhabit-api");
        assert!(config.otlp_endpoint.is_none());
        assert!(config.log_level.is_none());
    }

    #[test]
    fn test_filter_directives_append_log_level() {
        let mut config = TelemetryConfig::default();
        assert_eq!(config.filter_directives(), DEFAULT_LOG_FILTER);

        config.log_level = Some("devhabit_rest=trace".to_string());
        assert_eq!(config.filter_directives(), format!("{},devhabit_rest=trace", DEFAULT_LOG_FILTER));

        config.log_level = Some("  ".to_string());
        assert_eq!(config.filter_directives(), DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_second_init_reports_error() {
        let config = TelemetryConfig::default();
        let _ = init_telemetry(&config);
        assert!(init_telemetry(&config).is_err());
    }
}
