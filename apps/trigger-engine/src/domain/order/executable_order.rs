//! Executable order produced by a fired trigger.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::value_objects::{OrderSide, OrderType};
use crate::domain::shared::{OrderId, Symbol, Timestamp};

/// An immediately-executable order handed to the execution sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutableOrder {
    /// Identifier of the converted order.
    pub id: OrderId,
    /// The conditional order this was converted from.
    pub parent_order_id: OrderId,
    /// Symbol to trade.
    pub symbol: Symbol,
    /// Side to submit.
    pub side: OrderSide,
    /// Market or limit.
    pub order_type: OrderType,
    /// Unsigned quantity.
    pub quantity: Decimal,
    /// Limit price (limit orders only).
    pub limit_price: Option<Decimal>,
    /// Price that fired the trigger.
    pub trigger_price: Decimal,
    /// Conversion time.
    pub created_at: Timestamp,
}

impl ExecutableOrder {
    /// Create a market order converted from `parent_order_id`.
    #[must_use]
    pub fn market(
        parent_order_id: OrderId,
        symbol: Symbol,
        side: OrderSide,
        quantity: Decimal,
        trigger_price: Decimal,
    ) -> Self {
        Self {
            id: OrderId::generate(),
            parent_order_id,
            symbol,
            side,
            order_type: OrderType::Market,
            quantity,
            limit_price: None,
            trigger_price,
            created_at: Timestamp::now(),
        }
    }

    /// Create a limit order converted from `parent_order_id`.
    #[must_use]
    pub fn limit(
        parent_order_id: OrderId,
        symbol: Symbol,
        side: OrderSide,
        quantity: Decimal,
        limit_price: Decimal,
        trigger_price: Decimal,
    ) -> Self {
        Self {
            order_type: OrderType::Limit,
            limit_price: Some(limit_price),
            ..Self::market(parent_order_id, symbol, side, quantity, trigger_price)
        }
    }
}
