//! Trigger side resolution.
//!
//! Stop-loss and trailing stops are exit orders in this paper-trading setup
//! and always resolve to SELL. Other convertible types infer the side from the
//! sign of the order quantity, and the legacy mapping for that (positive sells)
//! looks inverted. Both mappings are kept selectable until the polarity is
//! confirmed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TriggerType;
use crate::domain::order::OrderSide;

/// Policy deciding which side a trigger condition watches and submits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSidePolicy {
    /// Legacy mapping: positive quantity sells, negative buys.
    #[default]
    ExitPosition,
    /// Positive quantity buys, negative sells.
    QuantityDirection,
}

impl TriggerSidePolicy {
    /// Resolve the trigger side for an order.
    #[must_use]
    pub fn resolve(&self, trigger_type: TriggerType, quantity: Decimal) -> OrderSide {
        match trigger_type {
            TriggerType::StopLoss | TriggerType::TrailingStop => OrderSide::Sell,
            TriggerType::StopLimit => {
                let positive = quantity > Decimal::ZERO;
                match (self, positive) {
                    (Self::ExitPosition, true) | (Self::QuantityDirection, false) => {
                        OrderSide::Sell
                    }
                    (Self::ExitPosition, false) | (Self::QuantityDirection, true) => {
                        OrderSide::Buy
                    }
                }
            }
        }
    }
}
