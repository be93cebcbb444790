//! Application Ports (Driven)
//!
//! Interfaces for the external collaborators the trigger engine depends on.

mod execution_sink_port;
mod order_converter_port;
mod order_store_port;
mod quote_source_port;

pub use execution_sink_port::{ExecutionSinkError, ExecutionSinkPort};
pub use order_converter_port::{ConversionError, OrderConverterPort};
pub use order_store_port::{OrderStoreError, TriggerOrderStorePort};
pub use quote_source_port::{Quote, QuoteSourceError, QuoteSourcePort};

#[cfg(test)]
pub use execution_sink_port::MockExecutionSinkPort;
#[cfg(test)]
pub use order_converter_port::MockOrderConverterPort;
#[cfg(test)]
pub use order_store_port::MockTriggerOrderStorePort;
#[cfg(test)]
pub use quote_source_port::MockQuoteSourcePort;
