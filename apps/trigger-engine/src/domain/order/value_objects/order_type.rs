//! Order type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Order type specifying execution behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Market order - execute at best available price.
    Market,
    /// Limit order - execute at specified price or better.
    Limit,
    /// Stop-loss - becomes a market order when the stop price is crossed.
    StopLoss,
    /// Stop-limit - becomes a limit order when the stop price is crossed.
    StopLimit,
    /// Trailing stop - stop price follows the best price seen.
    TrailingStop,
}

impl OrderType {
    /// Returns true if orders of this type wait on a price trigger.
    #[must_use]
    pub const fn is_conditional(&self) -> bool {
        matches!(self, Self::StopLoss | Self::StopLimit | Self::TrailingStop)
    }

    /// Returns true if this type can be submitted as-is.
    #[must_use]
    pub const fn is_executable(&self) -> bool {
        matches!(self, Self::Market | Self::Limit)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Market => write!(f, "market"),
            Self::Limit => write!(f, "limit"),
            Self::StopLoss => write!(f, "stop_loss"),
            Self::StopLimit => write!(f, "stop_limit"),
            Self::TrailingStop => write!(f, "trailing_stop"),
        }
    }
}
