//! Introspection snapshots.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::order::OrderSide;
use crate::domain::shared::{OrderId, Symbol, Timestamp};
use crate::domain::trigger::{TriggerCondition, TriggerType};

/// Engine state and counters at a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStatus {
    /// Whether the monitoring loop is running.
    pub running: bool,
    /// Number of monitored symbols.
    pub monitored_symbols: usize,
    /// Number of live conditions across all symbols.
    pub total_conditions: usize,
    /// Fired conditions that entered processing.
    pub orders_processed: u64,
    /// Orders persisted and handed to the execution sink.
    pub orders_triggered: u64,
    /// Completion time of the last evaluation pass.
    pub last_check_time: Option<Timestamp>,
    /// Monitored symbols, sorted.
    pub symbols: Vec<Symbol>,
}

/// One live condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoredOrder {
    /// Watched order.
    pub order_id: OrderId,
    /// Side submitted on trigger.
    pub side: OrderSide,
    /// Trigger type.
    pub trigger_type: TriggerType,
    /// Current trigger price.
    pub trigger_price: Decimal,
    /// Registration time.
    pub created_at: Timestamp,
    /// Highest observed price (sell-side trailing stops).
    pub high_water_mark: Option<Decimal>,
    /// Lowest observed price (buy-side trailing stops).
    pub low_water_mark: Option<Decimal>,
}

impl From<&TriggerCondition> for MonitoredOrder {
    fn from(condition: &TriggerCondition) -> Self {
        Self {
            order_id: condition.order_id().clone(),
            side: condition.side(),
            trigger_type: condition.trigger_type(),
            trigger_price: condition.trigger_price(),
            created_at: condition.created_at(),
            high_water_mark: condition.high_water_mark(),
            low_water_mark: condition.low_water_mark(),
        }
    }
}

/// Live conditions keyed by symbol.
pub type MonitoredOrders = BTreeMap<Symbol, Vec<MonitoredOrder>>;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn monitored_order_from_trailing_condition() {
        let mut condition = TriggerCondition::trailing(
            OrderId::new("ord-1"),
            Symbol::new("AAPL"),
            OrderSide::Sell,
            crate::domain::trigger::TrailMethod::Amount(dec!(2)),
        );
        condition.reprice(dec!(100));

        let snapshot = MonitoredOrder::from(&condition);

        assert_eq!(snapshot.order_id.as_str(), "ord-1");
        assert_eq!(snapshot.trigger_type, TriggerType::TrailingStop);
        assert_eq!(snapshot.trigger_price, dec!(98));
        assert_eq!(snapshot.high_water_mark, Some(dec!(100)));
        assert!(snapshot.low_water_mark.is_none());
    }

    #[test]
    fn status_serializes_to_json() {
        let status = EngineStatus {
            running: true,
            monitored_symbols: 1,
            total_conditions: 2,
            orders_processed: 3,
            orders_triggered: 2,
            last_check_time: None,
            symbols: vec![Symbol::new("AAPL")],
        };

        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["running"], true);
        assert_eq!(json["symbols"][0], "AAPL");
        assert!(json["last_check_time"].is_null());
    }

    #[test]
    fn monitored_orders_serialize_keyed_by_symbol() {
        let condition = TriggerCondition::new(
            OrderId::new("ord-1"),
            Symbol::new("MSFT"),
            TriggerType::StopLoss,
            dec!(400),
            OrderSide::Sell,
        );
        let mut orders = MonitoredOrders::new();
        orders.insert(Symbol::new("MSFT"), vec![MonitoredOrder::from(&condition)]);

        let json = serde_json::to_value(&orders).unwrap();
        assert_eq!(json["MSFT"][0]["order_id"], "ord-1");
        assert_eq!(json["MSFT"][0]["trigger_type"], "stop_loss");
        assert_eq!(json["MSFT"][0]["trigger_price"], "400");
    }
}
