//! Order Converter Port (Driven Port)
//!
//! Turns a fired conditional order into an executable order. The arithmetic
//! lives behind this port; the engine only dispatches by trigger type.
//! Implementations are synchronous and run on the engine's worker pool.

use rust_decimal::Decimal;

use crate::domain::order::{ConditionalOrder, ExecutableOrder};

/// Converter validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// A price the order type requires is missing.
    #[error("missing {field} for order {order_id}")]
    MissingField {
        /// Offending order.
        order_id: String,
        /// Name of the missing field.
        field: &'static str,
    },

    /// The trigger configuration is malformed.
    #[error("invalid trigger configuration for order {order_id}: {message}")]
    InvalidConfiguration {
        /// Offending order.
        order_id: String,
        /// Error details.
        message: String,
    },
}

/// Port for converting conditional orders.
#[cfg_attr(test, mockall::automock)]
pub trait OrderConverterPort: Send + Sync {
    /// Whether the order is a conditional type this converter handles.
    fn can_convert(&self, order: &ConditionalOrder) -> bool;

    /// Check the order's trigger configuration.
    fn validate(&self, order: &ConditionalOrder) -> Result<(), ConversionError>;

    /// Convert a fired stop-loss into a market order.
    fn convert_stop_loss_to_market(
        &self,
        order: &ConditionalOrder,
        trigger_price: Decimal,
    ) -> Option<ExecutableOrder>;

    /// Convert a fired stop-limit into a limit order.
    fn convert_stop_limit_to_limit(
        &self,
        order: &ConditionalOrder,
        trigger_price: Decimal,
    ) -> Option<ExecutableOrder>;

    /// Convert a fired trailing stop into a market order.
    fn convert_trailing_stop_to_market(
        &self,
        order: &ConditionalOrder,
        trigger_price: Decimal,
    ) -> Option<ExecutableOrder>;
}
