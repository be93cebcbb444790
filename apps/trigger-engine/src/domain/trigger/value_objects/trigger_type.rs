//! Trigger type.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::order::OrderType;

/// Kind of conditional order a trigger condition watches for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerType {
    /// Converts to a market order on trigger.
    StopLoss,
    /// Converts to a limit order on trigger.
    StopLimit,
    /// Trails the best price; converts to a market order on trigger.
    TrailingStop,
}

impl TriggerType {
    /// Map an order type to its trigger type, if it has one.
    #[must_use]
    pub const fn from_order_type(order_type: OrderType) -> Option<Self> {
        match order_type {
            OrderType::StopLoss => Some(Self::StopLoss),
            OrderType::StopLimit => Some(Self::StopLimit),
            OrderType::TrailingStop => Some(Self::TrailingStop),
            OrderType::Market | OrderType::Limit => None,
        }
    }

    /// Label used in logs and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StopLoss => "stop_loss",
            Self::StopLimit => "stop_limit",
            Self::TrailingStop => "trailing_stop",
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
