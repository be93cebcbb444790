//! Execution Sink Adapters

pub mod logging_sink;

pub use logging_sink::LoggingExecutionSink;
