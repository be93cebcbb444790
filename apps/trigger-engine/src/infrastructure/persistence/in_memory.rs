//! In-memory conditional order store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::application::ports::{OrderStoreError, TriggerOrderStorePort};
use crate::domain::order::ConditionalOrder;
use crate::domain::shared::{OrderId, Timestamp};

/// In-memory implementation of `TriggerOrderStorePort`.
///
/// Suitable for testing and standalone runs. Not durable.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, ConditionalOrder>>,
    unavailable: AtomicBool,
}

impl InMemoryOrderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }

    /// Insert or replace an order.
    pub fn insert(&self, order: ConditionalOrder) {
        self.orders.write().insert(order.id.clone(), order);
    }

    /// Snapshot of a stored order.
    #[must_use]
    pub fn get(&self, id: &OrderId) -> Option<ConditionalOrder> {
        self.orders.read().get(id).cloned()
    }

    /// Delete an order. Returns it if present.
    pub fn delete(&self, id: &OrderId) -> Option<ConditionalOrder> {
        self.orders.write().remove(id)
    }

    /// Make every call fail with `OrderStoreError::Unavailable`.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), OrderStoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(OrderStoreError::Unavailable {
                message: "in-memory store marked unavailable".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl TriggerOrderStorePort for InMemoryOrderStore {
    async fn load_pending_trigger_orders(&self) -> Result<Vec<ConditionalOrder>, OrderStoreError> {
        self.check_available()?;

        let orders = self.orders.read();
        let mut pending: Vec<ConditionalOrder> = orders
            .values()
            .filter(|o| o.is_pending() && o.order_type.is_conditional())
            .cloned()
            .collect();
        pending.sort_by_key(|o| o.created_at);
        Ok(pending)
    }

    async fn load_order(&self, id: &OrderId) -> Result<Option<ConditionalOrder>, OrderStoreError> {
        self.check_available()?;
        Ok(self.get(id))
    }

    async fn update_triggered_status(
        &self,
        id: &OrderId,
        trigger_price: Decimal,
    ) -> Result<(), OrderStoreError> {
        self.check_available()?;

        let mut orders = self.orders.write();
        let order = orders.get_mut(id).ok_or_else(|| OrderStoreError::NotFound {
            order_id: id.to_string(),
        })?;

        if !order.is_pending() {
            return Err(OrderStoreError::NotPending {
                order_id: id.to_string(),
            });
        }

        order.mark_triggered(trigger_price, Timestamp::now());
        Ok(())
    }
}
