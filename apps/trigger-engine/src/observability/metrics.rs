//! Prometheus metrics for the trigger engine.
//!
//! Recording functions are no-ops until a recorder is installed, so the engine
//! can call them unconditionally.
//!
//! # Example
//!
//! ```ignore
//! use trigger_engine::observability::{init_metrics, MetricsConfig};
//!
//! init_metrics(&MetricsConfig::default())?;
//! record_condition_fired("stop_loss");
//! ```

use std::net::{Ipv4Addr, SocketAddr};

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Configuration for the metrics exporter.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Address to bind the metrics HTTP listener.
    pub listen_addr: SocketAddr,
    /// Histogram buckets for pass duration (in seconds).
    pub pass_duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, 9090)),
            // 1ms to 10s
            pass_duration_buckets: vec![0.001, 0.005, 0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 10.0],
        }
    }
}

impl MetricsConfig {
    /// Create a metrics configuration with a custom address.
    #[must_use]
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            listen_addr: addr,
            ..Default::default()
        }
    }
}

/// Error type for metrics operations.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Failed to configure metrics exporter.
    #[error("metrics configuration error: {0}")]
    Configuration(String),
    /// Failed to install metrics exporter.
    #[error("metrics installation error: {0}")]
    Installation(String),
}

/// Install the Prometheus recorder and start its HTTP listener.
///
/// Exposes metrics at `/metrics`.
pub fn init_metrics(config: &MetricsConfig) -> Result<(), MetricsError> {
    PrometheusBuilder::new()
        .with_http_listener(config.listen_addr)
        .set_buckets(&config.pass_duration_buckets)
        .map_err(|e| MetricsError::Configuration(e.to_string()))?
        .install()
        .map_err(|e| MetricsError::Installation(e.to_string()))?;

    tracing::info!(
        addr = %config.listen_addr,
        "Prometheus metrics exporter started"
    );

    Ok(())
}

// ============================================================================
// Registry
// ============================================================================

/// Record a condition added to the registry.
pub fn record_condition_registered() {
    counter!("trigger_conditions_registered_total").increment(1);
}

/// Record a condition whose predicate fired.
pub fn record_condition_fired(trigger_type: &str) {
    counter!(
        "trigger_conditions_fired_total",
        "trigger_type" => trigger_type.to_string()
    )
    .increment(1);
}

/// Update the monitored symbols gauge.
pub fn update_monitored_symbols(count: usize) {
    gauge!("trigger_monitored_symbols").set(count as f64);
}

// ============================================================================
// Processing
// ============================================================================

/// Record a converted order handed to the execution sink.
pub fn record_order_executed(trigger_type: &str) {
    counter!(
        "trigger_orders_executed_total",
        "trigger_type" => trigger_type.to_string()
    )
    .increment(1);
}

/// Record a fired condition that did not reach the execution sink.
///
/// # Arguments
///
/// * `reason` - Failure reason (e.g., `"order_not_found"`, `"execution_failed"`)
pub fn record_processing_failure(reason: &str) {
    counter!(
        "trigger_processing_failures_total",
        "reason" => reason.to_string()
    )
    .increment(1);
}

// ============================================================================
// Monitoring Loop
// ============================================================================

/// Record the duration of one evaluation pass.
pub fn record_pass_duration(seconds: f64) {
    histogram!("trigger_pass_duration_seconds").record(seconds);
}
