//! Conditional order record.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::value_objects::{OrderStatus, OrderType};
use crate::domain::shared::{OrderId, Symbol, Timestamp};

/// A dormant order that only becomes executable once its trigger fires.
///
/// Quantity is signed: positive for long, negative for short. The trigger side
/// is derived from it through a `TriggerSidePolicy`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalOrder {
    /// Order identifier.
    pub id: OrderId,
    /// Symbol the order trades.
    pub symbol: Symbol,
    /// Order type.
    pub order_type: OrderType,
    /// Signed quantity.
    pub quantity: Decimal,
    /// Stop price (stop-loss and stop-limit).
    pub stop_price: Option<Decimal>,
    /// Limit price (stop-limit).
    pub limit_price: Option<Decimal>,
    /// Trailing distance as a percentage of the water mark (5.0 = 5%).
    pub trail_percent: Option<Decimal>,
    /// Trailing distance as a fixed price amount.
    pub trail_amount: Option<Decimal>,
    /// Current status.
    pub status: OrderStatus,
    /// Creation time.
    pub created_at: Timestamp,
    /// Price at which the trigger fired.
    #[serde(default)]
    pub trigger_price: Option<Decimal>,
    /// When the trigger fired.
    #[serde(default)]
    pub triggered_at: Option<Timestamp>,
    /// When the converted order was filled.
    #[serde(default)]
    pub filled_at: Option<Timestamp>,
}

impl ConditionalOrder {
    fn pending(id: OrderId, symbol: Symbol, order_type: OrderType, quantity: Decimal) -> Self {
        Self {
            id,
            symbol,
            order_type,
            quantity,
            stop_price: None,
            limit_price: None,
            trail_percent: None,
            trail_amount: None,
            status: OrderStatus::Pending,
            created_at: Timestamp::now(),
            trigger_price: None,
            triggered_at: None,
            filled_at: None,
        }
    }

    /// Create a pending stop-loss order.
    #[must_use]
    pub fn stop_loss(
        id: impl Into<OrderId>,
        symbol: impl Into<Symbol>,
        quantity: Decimal,
        stop_price: Decimal,
    ) -> Self {
        Self {
            stop_price: Some(stop_price),
            ..Self::pending(id.into(), symbol.into(), OrderType::StopLoss, quantity)
        }
    }

    /// Create a pending stop-limit order.
    #[must_use]
    pub fn stop_limit(
        id: impl Into<OrderId>,
        symbol: impl Into<Symbol>,
        quantity: Decimal,
        stop_price: Decimal,
        limit_price: Decimal,
    ) -> Self {
        Self {
            stop_price: Some(stop_price),
            limit_price: Some(limit_price),
            ..Self::pending(id.into(), symbol.into(), OrderType::StopLimit, quantity)
        }
    }

    /// Create a pending trailing stop that trails by a percentage.
    #[must_use]
    pub fn trailing_percent(
        id: impl Into<OrderId>,
        symbol: impl Into<Symbol>,
        quantity: Decimal,
        trail_percent: Decimal,
    ) -> Self {
        Self {
            trail_percent: Some(trail_percent),
            ..Self::pending(id.into(), symbol.into(), OrderType::TrailingStop, quantity)
        }
    }

    /// Create a pending trailing stop that trails by a fixed amount.
    #[must_use]
    pub fn trailing_amount(
        id: impl Into<OrderId>,
        symbol: impl Into<Symbol>,
        quantity: Decimal,
        trail_amount: Decimal,
    ) -> Self {
        Self {
            trail_amount: Some(trail_amount),
            ..Self::pending(id.into(), symbol.into(), OrderType::TrailingStop, quantity)
        }
    }

    /// Create a plain order of any type (used for non-conditional records).
    #[must_use]
    pub fn new(
        id: impl Into<OrderId>,
        symbol: impl Into<Symbol>,
        order_type: OrderType,
        quantity: Decimal,
    ) -> Self {
        Self::pending(id.into(), symbol.into(), order_type, quantity)
    }

    /// Returns true while the order is still waiting for its trigger.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, OrderStatus::Pending)
    }

    /// Apply the terminal transition written when a trigger fires.
    pub fn mark_triggered(&mut self, trigger_price: Decimal, at: Timestamp) {
        self.status = OrderStatus::Filled;
        self.trigger_price = Some(trigger_price);
        self.triggered_at = Some(at);
        self.filled_at = Some(at);
    }
}
