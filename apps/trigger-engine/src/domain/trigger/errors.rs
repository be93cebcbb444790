//! Trigger Errors
//!
//! Configuration errors surfaced synchronously to whoever registers an order.

use thiserror::Error;

use crate::domain::order::OrderType;

/// Errors raised while turning a conditional order into a trigger condition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TriggerError {
    /// The order type has no trigger semantics.
    #[error("unsupported order type for trigger: {order_type} (order {order_id})")]
    UnsupportedOrderType {
        /// Offending order.
        order_id: String,
        /// Its type.
        order_type: OrderType,
    },

    /// A stop-loss or stop-limit without a stop price.
    #[error("order {order_id} has no stop price")]
    MissingStopPrice {
        /// Offending order.
        order_id: String,
    },

    /// Trailing stop with both or neither of percent/amount, or a
    /// non-positive distance.
    #[error("invalid trailing configuration for order {order_id}: {message}")]
    InvalidTrailConfig {
        /// Offending order.
        order_id: String,
        /// Error details.
        message: String,
    },

    /// The order converter rejected the order.
    #[error("order {order_id} failed validation: {message}")]
    ValidationFailed {
        /// Offending order.
        order_id: String,
        /// Error details.
        message: String,
    },
}
