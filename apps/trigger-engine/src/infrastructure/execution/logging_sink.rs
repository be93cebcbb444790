//! Logging execution sink.
//!
//! Records and logs converted orders instead of routing them anywhere.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::application::ports::{ExecutionSinkError, ExecutionSinkPort};
use crate::domain::order::ExecutableOrder;

/// Execution sink that keeps every accepted order in memory.
#[derive(Debug, Default)]
pub struct LoggingExecutionSink {
    executed: Mutex<Vec<ExecutableOrder>>,
    rejecting: AtomicBool,
}

impl LoggingExecutionSink {
    /// Create an accepting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject every order while set.
    pub fn set_rejecting(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::SeqCst);
    }

    /// Orders accepted so far, in submission order.
    #[must_use]
    pub fn executed(&self) -> Vec<ExecutableOrder> {
        self.executed.lock().clone()
    }

    /// Number of accepted orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.executed.lock().len()
    }

    /// Whether nothing has been accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.executed.lock().is_empty()
    }
}

#[async_trait]
impl ExecutionSinkPort for LoggingExecutionSink {
    async fn execute(&self, order: &ExecutableOrder) -> Result<(), ExecutionSinkError> {
        if self.rejecting.load(Ordering::SeqCst) {
            return Err(ExecutionSinkError::Rejected {
                order_id: order.id.to_string(),
                reason: "sink is rejecting orders".to_string(),
            });
        }

        tracing::info!(
            order_id = %order.id,
            parent_order_id = %order.parent_order_id,
            symbol = %order.symbol,
            side = %order.side,
            order_type = %order.order_type,
            quantity = %order.quantity,
            limit_price = ?order.limit_price,
            trigger_price = %order.trigger_price,
            "Executing converted order"
        );

        self.executed.lock().push(order.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::order::OrderSide;
    use crate::domain::shared::{OrderId, Symbol};
    use rust_decimal_macros::dec;

    fn order() -> ExecutableOrder {
        ExecutableOrder::market(
            OrderId::new("ord-1"),
            Symbol::new("AAPL"),
            OrderSide::Sell,
            dec!(10),
            dec!(144),
        )
    }

    #[tokio::test]
    async fn records_accepted_orders() {
        let sink = LoggingExecutionSink::new();
        sink.execute(&order()).await.unwrap();

        assert_eq!(sink.len(), 1);
        assert_eq!(sink.executed()[0].parent_order_id.as_str(), "ord-1");
    }

    #[tokio::test]
    async fn rejecting_sink_records_nothing() {
        let sink = LoggingExecutionSink::new();
        sink.set_rejecting(true);

        assert!(sink.execute(&order()).await.is_err());
        assert!(sink.is_empty());
    }
}
