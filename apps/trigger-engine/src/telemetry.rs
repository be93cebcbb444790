//! Tracing Setup
//!
//! Initializes the `tracing` subscriber and, when enabled, an OpenTelemetry
//! OTLP exporter.
//!
//! # Configuration
//!
//! - `RUST_LOG`: overrides the level from [`LoggingConfig`]
//! - `OTEL_ENABLED`: Set to `true` to export spans over OTLP (default: off)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP gRPC endpoint (default: `http://localhost:4317`)
//! - `OTEL_SERVICE_NAME`: Service name for traces (default: `trigger-engine`)
//!
//! # Usage
//!
//! ```rust,ignore
//! use trigger_engine::telemetry::init_telemetry;
//!
//! #[tokio::main]
//! async fn main() {
//!     let _guard = init_telemetry(&config.observability.logging);
//!     // ... application code
//! }
//! ```

use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{LogFormat, LoggingConfig};

/// Guard that shuts down the tracer provider on drop.
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl TelemetryGuard {
    /// Whether spans are exported over OTLP.
    #[must_use]
    pub const fn otel_enabled(&self) -> bool {
        self.provider.is_some()
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.take()
            && let Err(e) = provider.shutdown()
        {
            eprintln!("Error shutting down tracer provider: {e:?}");
        }
    }
}

/// Default filter directive for a configured level.
fn default_directive(level: &str) -> String {
    format!("trigger_engine={}", level.to_ascii_lowercase())
}

fn otel_enabled_from_env() -> bool {
    std::env::var("OTEL_ENABLED")
        .map(|v| v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Build the OTLP tracer provider, or `None` when the exporter cannot be created.
fn build_provider(endpoint: &str) -> Option<SdkTracerProvider> {
    match opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
    {
        Ok(exporter) => Some(
            SdkTracerProvider::builder()
                .with_simple_exporter(exporter)
                .build(),
        ),
        Err(e) => {
            eprintln!("Failed to create OTLP exporter: {e:?}, falling back to console logging");
            None
        }
    }
}

/// Initialize tracing.
///
/// Returns a guard that will shut down the tracer provider when dropped.
///
/// # Panics
///
/// Panics if a global subscriber is already installed.
#[must_use]
pub fn init_telemetry(logging: &LoggingConfig) -> TelemetryGuard {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&logging.level)));

    let fmt_layer = match logging.format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_target(true)
            .boxed(),
        LogFormat::Pretty => tracing_subscriber::fmt::layer().pretty().boxed(),
    };

    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
        .unwrap_or_else(|_| "http://localhost:4317".to_string());
    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "trigger-engine".to_string());

    let provider = if otel_enabled_from_env() {
        build_provider(&endpoint)
    } else {
        None
    };

    let otel_layer = provider.as_ref().map(|p| {
        tracing_opentelemetry::layer().with_tracer(p.tracer(service_name.clone()))
    });

    Registry::default()
        .with(env_filter)
        .with(fmt_layer)
        .with(otel_layer)
        .init();

    if provider.is_some() {
        tracing::info!(
            service_name = %service_name,
            endpoint = %endpoint,
            "OpenTelemetry initialized"
        );
    } else {
        tracing::debug!("OpenTelemetry disabled, using console logging only");
    }

    TelemetryGuard { provider }
}
