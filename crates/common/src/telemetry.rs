//! Logging and tracing initialization.
//!
//! Installs a `tracing-subscriber` registry writing human-readable logs to stderr.
//! When the `telemetry` feature is enabled and `telemetry.enabled` is set, spans are
//! additionally exported to an OTLP/gRPC collector.

use crate::config::TelemetryConfig;
use anyhow::Result;

#[cfg(feature = "telemetry")]
use {
    opentelemetry::trace::TracerProvider, opentelemetry::KeyValue,
    opentelemetry_otlp::WithExportConfig,
    opentelemetry_sdk::trace::TracerProvider as SdkTracerProvider, opentelemetry_sdk::Resource,
    tracing_opentelemetry::OpenTelemetryLayer,
};

use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub fn init_telemetry<S>(
    service_name: &str,
    endpoint: &str,
) -> Result<Box<dyn Layer<S> + Send + Sync>>
where
    S: tracing::Subscriber + for<'span> LookupSpan<'span> + Send + Sync,
{
    #[cfg(feature = "telemetry")]
    {
        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint)
            .build()?;

        let provider = SdkTracerProvider::builder()
            .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
            .with_resource(Resource::new(vec![KeyValue::new(
                "service.name",
                service_name.to_string(),
            )]))
            .build();

        let tracer = provider.tracer(service_name.to_string());
        opentelemetry::global::set_tracer_provider(provider);

        Ok(Box::new(OpenTelemetryLayer::new(tracer)))
    }
    #[cfg(not(feature = "telemetry"))]
    {
        if !endpoint.is_empty() {
            tracing::debug!(
                service = service_name,
                "OTLP export requested but the `telemetry` feature is disabled"
            );
        }
        Ok(Box::new(tracing_subscriber::layer::Identity::new()))
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence over `level`. Calling this twice is harmless; the
/// second call leaves the first subscriber in place.
pub fn init_logging(level: &str, telemetry: &TelemetryConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let otel_layer = if telemetry.enabled {
        init_telemetry(&telemetry.service_name, &telemetry.endpoint)?
    } else {
        Box::new(tracing_subscriber::layer::Identity::new())
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(otel_layer)
        .with(stderr_layer)
        .try_init()
        .ok();

    Ok(())
}

pub fn shutdown_telemetry() {
    #[cfg(feature = "telemetry")]
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        let telemetry = TelemetryConfig::default();
        assert!(init_logging("debug", &telemetry).is_ok());
        assert!(init_logging("info", &telemetry).is_ok());
        shutdown_telemetry();
    }
}
