// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Trigger Engine - Conditional Order Monitoring
//!
//! Watches dormant conditional orders (stop-loss, stop-limit, trailing stop),
//! evaluates them against live quotes and converts each fired order into an
//! executable market or limit order exactly once.
//!
//! # Architecture (Clean Architecture + Hexagonal)
//!
//! ## Layers (inside → outside)
//!
//! - **Domain**: Core business logic
//!   - `order`: Conditional and executable orders, sides, statuses
//!   - `trigger`: Trigger conditions, trailing repricing, the symbol registry
//!   - `shared`: Identifiers, symbols, timestamps
//!
//! - **Application**: Orchestration
//!   - `ports`: `QuoteSourcePort`, `OrderConverterPort`, `TriggerOrderStorePort`,
//!     `ExecutionSinkPort`
//!   - `services`: `OrderExecutionEngine` and its blocking worker pool
//!
//! - **Infrastructure**: Reference adapters
//!   - `persistence`: In-memory order store
//!   - `quotes`: Static quote source
//!   - `converter`: Standard order converter
//!   - `execution`: Logging execution sink
//!
//! Cross-cutting: `config` (YAML + env interpolation), `telemetry` (tracing and
//! OTLP), `observability` (Prometheus metrics).

// =============================================================================
// Clean Architecture Layers
// =============================================================================

/// Domain layer - Core business logic with no external dependencies.
pub mod domain;

/// Application layer - Engine service and port definitions.
pub mod application;

/// Infrastructure layer - Reference adapters.
pub mod infrastructure;

// =============================================================================
// Cross-cutting
// =============================================================================

/// Configuration loading and validation.
pub mod config;

/// Prometheus metrics.
pub mod observability;

/// Tracing subscriber and OpenTelemetry setup.
pub mod telemetry;

// =============================================================================
// Re-exports
// =============================================================================

pub use domain::order::{ConditionalOrder, ExecutableOrder, OrderSide, OrderStatus, OrderType};
pub use domain::shared::{InstrumentId, OrderId, Symbol, Timestamp};
pub use domain::trigger::{
    TrailMethod, TriggerCondition, TriggerError, TriggerRegistry, TriggerSidePolicy, TriggerType,
};

pub use application::ports::{
    ConversionError, ExecutionSinkError, ExecutionSinkPort, OrderConverterPort, OrderStoreError,
    Quote, QuoteSourceError, QuoteSourcePort, TriggerOrderStorePort,
};
pub use application::services::{
    EngineConfig, EngineStatus, MonitoredOrder, MonitoredOrders, OrderExecutionEngine,
    ProcessingStage, TriggerOutcome,
};

pub use infrastructure::{
    InMemoryOrderStore, LoggingExecutionSink, StandardOrderConverter, StaticQuoteSource,
};
