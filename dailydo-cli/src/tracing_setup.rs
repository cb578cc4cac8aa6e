//! Log output for `dailydo`, with optional span export
//!
//! One subscriber is always installed: an `EnvFilter` plus a compact console
//! layer. With `--otel` (and the `telemetry` feature) an OpenTelemetry layer is
//! stacked on the same registry, so console logs and exported spans go through
//! the same filter.
//!
//! Environment:
//!   RUST_LOG                          overrides the default directive
//!   OTEL_EXPORTER_OTLP_ENDPOINT       collector address (http://localhost:4317)
//!   OTEL_SERVICE_NAME                 reported service name (dailydo)

use anyhow::{anyhow, Result};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Layer type that can sit directly on the registry
type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Global logging flags from the command line
#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Lower the default level to debug and show event targets
    pub debug: bool,
    /// Export spans over OTLP
    pub otel: bool,
}

impl TracingConfig {
    /// Directive used when `RUST_LOG` is unset or unparsable
    fn default_directive(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_directive()))
    }
}

/// Install the global subscriber.
///
/// Fails if a subscriber is already set, or if `--otel` was requested and the
/// exporter cannot be built.
pub fn init(config: &TracingConfig) -> Result<()> {
    let export = span_export(config)?;

    let console = tracing_subscriber::fmt::layer()
        .with_target(config.debug)
        .compact();

    let endpoint = export.as_ref().map(|export| export.endpoint.clone());

    tracing_subscriber::registry()
        .with(export.map(|export| export.layer))
        .with(config.filter())
        .with(console)
        .try_init()
        .map_err(|err| anyhow!(err))?;

    if let Some(endpoint) = endpoint {
        tracing::info!(%endpoint, "exporting spans over OTLP");
    }
    Ok(())
}

/// Flush spans still buffered by the exporter.
pub fn shutdown_otel() {
    #[cfg(feature = "telemetry")]
    opentelemetry::global::shutdown_tracer_provider();
}

/// An exporting layer together with where it sends spans
#[cfg_attr(not(feature = "telemetry"), allow(dead_code))]
struct SpanExport {
    layer: BoxedLayer,
    endpoint: String,
}

#[cfg(feature = "telemetry")]
fn span_export(config: &TracingConfig) -> Result<Option<SpanExport>> {
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::TracerProvider;

    if !config.otel {
        return Ok(None);
    }

    let endpoint = env_or("OTEL_EXPORTER_OTLP_ENDPOINT", "http://localhost:4317");
    let service_name = env_or("OTEL_SERVICE_NAME", "dailydo");

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(&endpoint)
        .build()
        .map_err(|err| anyhow!("cannot build OTLP exporter for {endpoint}: {err}"))?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(opentelemetry_sdk::Resource::new([KeyValue::new(
            "service.name",
            service_name,
        )]))
        .build();

    let layer = tracing_opentelemetry::layer()
        .with_tracer(provider.tracer("dailydo"))
        .boxed();

    // The global handle keeps the batch exporter alive until shutdown_otel
    let _ = opentelemetry::global::set_tracer_provider(provider);

    Ok(Some(SpanExport { layer, endpoint }))
}

#[cfg(not(feature = "telemetry"))]
fn span_export(config: &TracingConfig) -> Result<Option<SpanExport>> {
    if config.otel {
        eprintln!("--otel ignored: built without the telemetry feature");
    }
    Ok(None)
}

#[cfg(feature = "telemetry")]
fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_lowers_default_level() {
        assert_eq!(TracingConfig::default().default_directive(), "info");

        let config = TracingConfig {
            debug: true,
            otel: false,
        };
        assert_eq!(config.default_directive(), "debug");
    }

    #[test]
    fn no_export_without_otel_flag() {
        let export = span_export(&TracingConfig::default()).unwrap();
        assert!(export.is_none());
    }
}
