//! Observability module for metrics.
//!
//! Tracing setup lives in [`crate::telemetry`].

mod metrics;

pub use self::metrics::{
    MetricsConfig, MetricsError, init_metrics, record_condition_fired, record_condition_registered,
    record_order_executed, record_pass_duration, record_processing_failure,
    update_monitored_symbols,
};
