//! Trigger Condition
//!
//! The in-memory watch entry for one conditional order. Pure data plus the
//! predicate and trailing-stop repricing logic; no I/O.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TriggerError;
use super::value_objects::{TrailMethod, TriggerSidePolicy, TriggerType};
use crate::domain::order::{ConditionalOrder, OrderSide};
use crate::domain::shared::{OrderId, Symbol, Timestamp};

/// A conditional order being watched for its price trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerCondition {
    order_id: OrderId,
    symbol: Symbol,
    trigger_type: TriggerType,
    /// Fixed for stops; follows the water mark for trailing stops.
    trigger_price: Decimal,
    /// Side submitted on trigger. Sell-side fires on the way down.
    side: OrderSide,
    created_at: Timestamp,
    high_water_mark: Option<Decimal>,
    low_water_mark: Option<Decimal>,
    trail: Option<TrailMethod>,
}

impl TriggerCondition {
    /// Create a condition with a fixed trigger price.
    #[must_use]
    pub fn new(
        order_id: OrderId,
        symbol: Symbol,
        trigger_type: TriggerType,
        trigger_price: Decimal,
        side: OrderSide,
    ) -> Self {
        Self {
            order_id,
            symbol,
            trigger_type,
            trigger_price,
            side,
            created_at: Timestamp::now(),
            high_water_mark: None,
            low_water_mark: None,
            trail: None,
        }
    }

    /// Create a trailing stop. The trigger price stays at the zero placeholder
    /// until the first price observation.
    #[must_use]
    pub fn trailing(order_id: OrderId, symbol: Symbol, side: OrderSide, trail: TrailMethod) -> Self {
        Self {
            trail: Some(trail),
            ..Self::new(
                order_id,
                symbol,
                TriggerType::TrailingStop,
                Decimal::ZERO,
                side,
            )
        }
    }

    /// Build the condition for a conditional order.
    ///
    /// Stop-loss and stop-limit take the order's stop price; trailing stops
    /// capture their trail distance and start unpriced. Any other order type is
    /// rejected.
    pub fn for_order(
        order: &ConditionalOrder,
        policy: TriggerSidePolicy,
    ) -> Result<Self, TriggerError> {
        let trigger_type = TriggerType::from_order_type(order.order_type).ok_or_else(|| {
            TriggerError::UnsupportedOrderType {
                order_id: order.id.to_string(),
                order_type: order.order_type,
            }
        })?;

        let side = policy.resolve(trigger_type, order.quantity);

        let condition = match trigger_type {
            TriggerType::StopLoss | TriggerType::StopLimit => {
                let stop = order
                    .stop_price
                    .ok_or_else(|| TriggerError::MissingStopPrice {
                        order_id: order.id.to_string(),
                    })?;
                Self::new(
                    order.id.clone(),
                    order.symbol.clone(),
                    trigger_type,
                    stop,
                    side,
                )
            }
            TriggerType::TrailingStop => Self::trailing(
                order.id.clone(),
                order.symbol.clone(),
                side,
                TrailMethod::from_order(order)?,
            ),
        };

        Ok(condition.with_created_at(order.created_at))
    }

    /// Override the creation time.
    #[must_use]
    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = created_at;
        self
    }

    /// Order this condition watches.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        &self.order_id
    }

    /// Symbol the condition is registered under.
    #[must_use]
    pub const fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    /// Trigger type.
    #[must_use]
    pub const fn trigger_type(&self) -> TriggerType {
        self.trigger_type
    }

    /// Current trigger price.
    #[must_use]
    pub const fn trigger_price(&self) -> Decimal {
        self.trigger_price
    }

    /// Side submitted on trigger.
    #[must_use]
    pub const fn side(&self) -> OrderSide {
        self.side
    }

    /// Registration time.
    #[must_use]
    pub const fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Highest price seen by a sell-side trailing stop.
    #[must_use]
    pub const fn high_water_mark(&self) -> Option<Decimal> {
        self.high_water_mark
    }

    /// Lowest price seen by a buy-side trailing stop.
    #[must_use]
    pub const fn low_water_mark(&self) -> Option<Decimal> {
        self.low_water_mark
    }

    /// Trailing distance, for trailing stops.
    #[must_use]
    pub const fn trail(&self) -> Option<TrailMethod> {
        self.trail
    }

    /// True once a trailing stop has seen a price. Fixed stops are always priced.
    #[must_use]
    pub const fn is_priced(&self) -> bool {
        match self.trigger_type {
            TriggerType::TrailingStop => {
                self.high_water_mark.is_some() || self.low_water_mark.is_some()
            }
            TriggerType::StopLoss | TriggerType::StopLimit => true,
        }
    }

    /// Whether `current_price` crosses the trigger.
    ///
    /// Sell-side fires at or below the trigger price, buy-side at or above.
    #[must_use]
    pub fn should_trigger(&self, current_price: Decimal) -> bool {
        if !self.is_priced() {
            return false;
        }

        match self.side {
            OrderSide::Sell => current_price <= self.trigger_price,
            OrderSide::Buy => current_price >= self.trigger_price,
        }
    }

    /// Reprice a trailing stop using the trail distance carried by `order`.
    ///
    /// Returns whether the trigger price moved. No-op for non-trailing types.
    pub fn update_trailing_stop(
        &mut self,
        current_price: Decimal,
        order: &ConditionalOrder,
    ) -> Result<bool, TriggerError> {
        if self.trigger_type != TriggerType::TrailingStop {
            return Ok(false);
        }

        let trail = TrailMethod::from_order(order)?;
        self.trail = Some(trail);
        Ok(self.apply_trail(current_price, trail))
    }

    /// Reprice a trailing stop using the trail distance captured at
    /// registration. Returns whether the trigger price moved.
    pub fn reprice(&mut self, current_price: Decimal) -> bool {
        match (self.trigger_type, self.trail) {
            (TriggerType::TrailingStop, Some(trail)) => self.apply_trail(current_price, trail),
            _ => false,
        }
    }

    /// Reprice, then evaluate the predicate. This is what an evaluation pass
    /// runs for every registered condition.
    pub fn observe(&mut self, current_price: Decimal) -> bool {
        self.reprice(current_price);
        self.should_trigger(current_price)
    }

    // The stop only ever tightens toward the market.
    fn apply_trail(&mut self, current_price: Decimal, trail: TrailMethod) -> bool {
        let first = !self.is_priced();

        let candidate = match self.side {
            OrderSide::Sell => {
                let high = self
                    .high_water_mark
                    .map_or(current_price, |h| h.max(current_price));
                self.high_water_mark = Some(high);
                trail.below(high)
            }
            OrderSide::Buy => {
                let low = self
                    .low_water_mark
                    .map_or(current_price, |l| l.min(current_price));
                self.low_water_mark = Some(low);
                trail.above(low)
            }
        };

        let tighter = match self.side {
            OrderSide::Sell => candidate > self.trigger_price,
            OrderSide::Buy => candidate < self.trigger_price,
        };

        if first || tighter {
            let changed = candidate != self.trigger_price;
            self.trigger_price = candidate;
            changed
        } else {
            false
        }
    }
}
