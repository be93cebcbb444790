//! Trailing distance.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order::ConditionalOrder;
use crate::domain::trigger::TriggerError;

/// How far a trailing stop sits from its water mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "method", content = "value")]
pub enum TrailMethod {
    /// Percentage of the water mark (5.0 = 5%).
    Percent(Decimal),
    /// Fixed price distance.
    Amount(Decimal),
}

impl TrailMethod {
    /// Extract the trailing distance from an order.
    ///
    /// Exactly one of `trail_percent` / `trail_amount` must be set and it must
    /// be positive.
    pub fn from_order(order: &ConditionalOrder) -> Result<Self, TriggerError> {
        let invalid = |message: &str| TriggerError::InvalidTrailConfig {
            order_id: order.id.to_string(),
            message: message.to_string(),
        };

        let method = match (order.trail_percent, order.trail_amount) {
            (Some(_), Some(_)) => {
                return Err(invalid("both trail_percent and trail_amount are set"));
            }
            (None, None) => {
                return Err(invalid("one of trail_percent or trail_amount is required"));
            }
            (Some(percent), None) => Self::Percent(percent),
            (None, Some(amount)) => Self::Amount(amount),
        };

        match method {
            Self::Percent(p) if p <= Decimal::ZERO || p >= Decimal::ONE_HUNDRED => {
                Err(invalid("trail_percent must be between 0 and 100"))
            }
            Self::Amount(a) if a <= Decimal::ZERO => Err(invalid("trail_amount must be positive")),
            _ => Ok(method),
        }
    }

    /// Stop level for a sell-side trail below the high water mark.
    #[must_use]
    pub fn below(&self, high_water_mark: Decimal) -> Decimal {
        match self {
            Self::Percent(p) => {
                high_water_mark * (Decimal::ONE - *p / Decimal::ONE_HUNDRED)
            }
            Self::Amount(a) => high_water_mark - *a,
        }
    }

    /// Stop level for a buy-side trail above the low water mark.
    #[must_use]
    pub fn above(&self, low_water_mark: Decimal) -> Decimal {
        match self {
            Self::Percent(p) => low_water_mark * (Decimal::ONE + *p / Decimal::ONE_HUNDRED),
            Self::Amount(a) => low_water_mark + *a,
        }
    }
}
