//! Standard order converter.
//!
//! Stop-loss and trailing stops become market orders; stop-limits become limit
//! orders at their limit price. The submitted side follows the same
//! `TriggerSidePolicy` the engine uses, so the converted order and the watched
//! condition agree.

use rust_decimal::Decimal;

use crate::application::ports::{ConversionError, OrderConverterPort};
use crate::domain::order::{ConditionalOrder, ExecutableOrder, OrderSide, OrderType};
use crate::domain::trigger::{TrailMethod, TriggerSidePolicy, TriggerType};

/// Reference converter for stop, stop-limit and trailing-stop orders.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardOrderConverter {
    side_policy: TriggerSidePolicy,
}

impl StandardOrderConverter {
    /// Create a converter resolving sides with `side_policy`.
    #[must_use]
    pub const fn new(side_policy: TriggerSidePolicy) -> Self {
        Self { side_policy }
    }

    fn side(&self, order: &ConditionalOrder, trigger_type: TriggerType) -> OrderSide {
        self.side_policy.resolve(trigger_type, order.quantity)
    }

    fn convertible(order: &ConditionalOrder, expected: OrderType) -> bool {
        order.order_type == expected && order.is_pending() && !order.quantity.is_zero()
    }
}

fn missing(order: &ConditionalOrder, field: &'static str) -> ConversionError {
    ConversionError::MissingField {
        order_id: order.id.to_string(),
        field,
    }
}

fn require_positive(
    order: &ConditionalOrder,
    value: Option<Decimal>,
    field: &'static str,
) -> Result<(), ConversionError> {
    match value {
        None => Err(missing(order, field)),
        Some(v) if v <= Decimal::ZERO => Err(ConversionError::InvalidConfiguration {
            order_id: order.id.to_string(),
            message: format!("{field} must be positive"),
        }),
        Some(_) => Ok(()),
    }
}

impl OrderConverterPort for StandardOrderConverter {
    fn can_convert(&self, order: &ConditionalOrder) -> bool {
        order.order_type.is_conditional() && order.is_pending()
    }

    fn validate(&self, order: &ConditionalOrder) -> Result<(), ConversionError> {
        if order.quantity.is_zero() {
            return Err(ConversionError::InvalidConfiguration {
                order_id: order.id.to_string(),
                message: "quantity must be non-zero".to_string(),
            });
        }

        match order.order_type {
            OrderType::StopLoss => require_positive(order, order.stop_price, "stop_price"),
            OrderType::StopLimit => {
                require_positive(order, order.stop_price, "stop_price")?;
                require_positive(order, order.limit_price, "limit_price")
            }
            OrderType::TrailingStop => TrailMethod::from_order(order).map(|_| ()).map_err(|e| {
                ConversionError::InvalidConfiguration {
                    order_id: order.id.to_string(),
                    message: e.to_string(),
                }
            }),
            OrderType::Market | OrderType::Limit => Err(ConversionError::InvalidConfiguration {
                order_id: order.id.to_string(),
                message: format!("{} orders have no trigger", order.order_type),
            }),
        }
    }

    fn convert_stop_loss_to_market(
        &self,
        order: &ConditionalOrder,
        trigger_price: Decimal,
    ) -> Option<ExecutableOrder> {
        if !Self::convertible(order, OrderType::StopLoss) {
            return None;
        }

        Some(ExecutableOrder::market(
            order.id.clone(),
            order.symbol.clone(),
            self.side(order, TriggerType::StopLoss),
            order.quantity.abs(),
            trigger_price,
        ))
    }

    fn convert_stop_limit_to_limit(
        &self,
        order: &ConditionalOrder,
        trigger_price: Decimal,
    ) -> Option<ExecutableOrder> {
        if !Self::convertible(order, OrderType::StopLimit) {
            return None;
        }

        Some(ExecutableOrder::limit(
            order.id.clone(),
            order.symbol.clone(),
            self.side(order, TriggerType::StopLimit),
            order.quantity.abs(),
            order.limit_price?,
            trigger_price,
        ))
    }

    fn convert_trailing_stop_to_market(
        &self,
        order: &ConditionalOrder,
        trigger_price: Decimal,
    ) -> Option<ExecutableOrder> {
        if !Self::convertible(order, OrderType::TrailingStop) {
            return None;
        }

        Some(ExecutableOrder::market(
            order.id.clone(),
            order.symbol.clone(),
            self.side(order, TriggerType::TrailingStop),
            order.quantity.abs(),
            trigger_price,
        ))
    }
}
