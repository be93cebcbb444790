//! Trigger Order Store Port (Driven Port)
//!
//! Persistence of conditional orders as seen by the trigger engine: recovery
//! at start-up, reload on trigger, and the single terminal write-back.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::order::ConditionalOrder;
use crate::domain::shared::OrderId;

/// Order store error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OrderStoreError {
    /// Backend unavailable or query failed.
    #[error("order store unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// The order does not exist.
    #[error("order not found: {order_id}")]
    NotFound {
        /// Missing order.
        order_id: String,
    },

    /// The order is no longer pending and cannot transition.
    #[error("order {order_id} is not pending")]
    NotPending {
        /// Offending order.
        order_id: String,
    },
}

/// Port for loading and updating conditional orders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TriggerOrderStorePort: Send + Sync {
    /// All pending stop-loss, stop-limit and trailing-stop orders.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails.
    async fn load_pending_trigger_orders(&self) -> Result<Vec<ConditionalOrder>, OrderStoreError>;

    /// Load an order by id.
    ///
    /// # Errors
    ///
    /// Returns error if the query fails. A missing order is `Ok(None)`.
    async fn load_order(&self, id: &OrderId) -> Result<Option<ConditionalOrder>, OrderStoreError>;

    /// Mark an order filled at `trigger_price`, setting triggered-at and
    /// filled-at.
    ///
    /// # Errors
    ///
    /// Returns error if the order is missing or the write fails.
    async fn update_triggered_status(
        &self,
        id: &OrderId,
        trigger_price: Decimal,
    ) -> Result<(), OrderStoreError>;
}
