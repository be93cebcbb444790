//! Order Execution Engine
//!
//! Watches conditional orders and converts them into executable orders when
//! their price trigger fires.
//!
//! # Lifecycle
//!
//! `STOPPED -> RUNNING -> STOPPED`, restartable. `start()` recovers pending
//! orders from the store and spawns the monitoring loop. `stop()` cancels the
//! loop, aborting any in-flight pass, then swaps in a fresh worker pool and
//! drains the old one, so manual passes keep working while stopped.
//!
//! # Locking
//!
//! The registry sits behind one `parking_lot::Mutex` that is only held for
//! in-memory mutation. Quote, store and sink calls run outside it.

mod evaluation;
mod processing;
mod status;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use rust_decimal::Decimal;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::worker_pool::WorkerPool;
use crate::application::ports::{
    ExecutionSinkPort, OrderConverterPort, OrderStoreError, QuoteSourcePort, TriggerOrderStorePort,
};
use crate::domain::order::ConditionalOrder;
use crate::domain::shared::{OrderId, Symbol, Timestamp};
use crate::domain::trigger::{TriggerCondition, TriggerError, TriggerRegistry, TriggerSidePolicy};
use crate::observability;

pub use processing::{ProcessingStage, TriggerOutcome};
pub use status::{EngineStatus, MonitoredOrder, MonitoredOrders};

/// Runtime configuration for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Delay between evaluation passes.
    pub poll_interval: Duration,
    /// Delay after a pass that failed as a whole.
    pub error_backoff: Duration,
    /// Blocking worker pool size.
    pub worker_pool_size: usize,
    /// Trigger side resolution.
    pub side_policy: TriggerSidePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            error_backoff: Duration::from_secs(5),
            worker_pool_size: 2,
            side_policy: TriggerSidePolicy::default(),
        }
    }
}

/// Lifecycle state. Only touched under `OrderExecutionEngine::state`.
#[derive(Debug, Default)]
struct EngineState {
    running: bool,
    cancel: Option<CancellationToken>,
    task: Option<JoinHandle<()>>,
}

/// State shared with the monitoring task.
struct EngineCore<Q, C, S, E> {
    config: EngineConfig,
    quotes: Arc<Q>,
    converter: Arc<C>,
    store: Arc<S>,
    sink: Arc<E>,
    registry: Mutex<TriggerRegistry>,
    pool: Mutex<Arc<WorkerPool>>,
    orders_processed: AtomicU64,
    orders_triggered: AtomicU64,
    last_pass_at: Mutex<Option<Timestamp>>,
}

impl<Q, C, S, E> EngineCore<Q, C, S, E> {
    fn pool(&self) -> Arc<WorkerPool> {
        Arc::clone(&self.pool.lock())
    }
}

/// Conditional order trigger engine.
pub struct OrderExecutionEngine<Q, C, S, E>
where
    Q: QuoteSourcePort,
    C: OrderConverterPort,
    S: TriggerOrderStorePort,
    E: ExecutionSinkPort,
{
    core: Arc<EngineCore<Q, C, S, E>>,
    state: Mutex<EngineState>,
    /// Serializes `start` and `stop`; held across their awaits.
    lifecycle: tokio::sync::Mutex<()>,
}

impl<Q, C, S, E> OrderExecutionEngine<Q, C, S, E>
where
    Q: QuoteSourcePort + 'static,
    C: OrderConverterPort + 'static,
    S: TriggerOrderStorePort + 'static,
    E: ExecutionSinkPort + 'static,
{
    /// Create a stopped engine with default configuration.
    #[must_use]
    pub fn new(quotes: Arc<Q>, converter: Arc<C>, store: Arc<S>, sink: Arc<E>) -> Self {
        Self::with_config(EngineConfig::default(), quotes, converter, store, sink)
    }

    /// Create a stopped engine.
    #[must_use]
    pub fn with_config(
        config: EngineConfig,
        quotes: Arc<Q>,
        converter: Arc<C>,
        store: Arc<S>,
        sink: Arc<E>,
    ) -> Self {
        Self {
            core: Arc::new(EngineCore {
                config,
                quotes,
                converter,
                store,
                sink,
                registry: Mutex::new(TriggerRegistry::new()),
                pool: Mutex::new(Arc::new(WorkerPool::new(config.worker_pool_size))),
                orders_processed: AtomicU64::new(0),
                orders_triggered: AtomicU64::new(0),
                last_pass_at: Mutex::new(None),
            }),
            state: Mutex::new(EngineState::default()),
            lifecycle: tokio::sync::Mutex::new(()),
        }
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.core.config
    }

    /// Whether the monitoring loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.lock().running
    }

    // ========================================================================
    // Registry
    // ========================================================================

    /// Start watching a conditional order.
    ///
    /// Returns `Ok(false)` when the converter does not handle the order; it
    /// is logged and ignored.
    ///
    /// # Errors
    ///
    /// Returns `TriggerError` if the converter rejects the order or its
    /// trigger configuration is incomplete.
    pub fn add(&self, order: &ConditionalOrder) -> Result<bool, TriggerError> {
        self.register(order, false)
    }

    /// Validate and insert. With `if_absent`, an order that already has a
    /// condition is left alone; the check and the insert share one lock.
    fn register(&self, order: &ConditionalOrder, if_absent: bool) -> Result<bool, TriggerError> {
        let converter = &self.core.converter;

        if !converter.can_convert(order) {
            tracing::warn!(
                order_id = %order.id,
                order_type = %order.order_type,
                "Order is not convertible, not monitoring"
            );
            return Ok(false);
        }

        converter
            .validate(order)
            .map_err(|e| TriggerError::ValidationFailed {
                order_id: order.id.to_string(),
                message: e.to_string(),
            })?;

        let condition = TriggerCondition::for_order(order, self.core.config.side_policy)?;
        let trigger_type = condition.trigger_type();
        let trigger_price = condition.trigger_price();
        let side = condition.side();

        let (inserted, symbols) = {
            let mut registry = self.core.registry.lock();
            let inserted = if if_absent {
                registry.insert_if_absent(condition)
            } else {
                registry.insert(condition);
                true
            };
            (inserted, registry.symbol_count())
        };

        if !inserted {
            tracing::debug!(order_id = %order.id, "Order already monitored");
            return Ok(false);
        }

        tracing::info!(
            order_id = %order.id,
            symbol = %order.symbol,
            trigger_type = %trigger_type,
            trigger_price = %trigger_price,
            side = %side,
            "Added trigger condition"
        );

        observability::record_condition_registered();
        observability::update_monitored_symbols(symbols);

        Ok(true)
    }

    /// Stop watching an order. Returns how many conditions were removed.
    pub fn remove(&self, order_id: &OrderId) -> usize {
        let (removed, symbols) = {
            let mut registry = self.core.registry.lock();
            let removed = registry.remove_order(order_id);
            (removed, registry.symbol_count())
        };

        if removed > 0 {
            tracing::info!(order_id = %order_id, removed, "Removed trigger condition");
            observability::update_monitored_symbols(symbols);
        }

        removed
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Recover pending orders and start the monitoring loop.
    ///
    /// No-op if already running.
    ///
    /// # Errors
    ///
    /// Returns `OrderStoreError` if pending orders cannot be loaded. The
    /// engine stays stopped.
    pub async fn start(&self) -> Result<(), OrderStoreError> {
        let _lifecycle = self.lifecycle.lock().await;

        if self.is_running() {
            tracing::info!("Trigger engine already running");
            return Ok(());
        }

        let recovered = self.recover_pending_orders().await?;

        let cancel = CancellationToken::new();
        let task = tokio::spawn(evaluation::run_monitoring_loop(
            Arc::clone(&self.core),
            cancel.clone(),
        ));

        {
            let mut state = self.state.lock();
            state.running = true;
            state.cancel = Some(cancel);
            state.task = Some(task);
        }

        tracing::info!(
            recovered,
            poll_interval_ms = self.core.config.poll_interval.as_millis() as u64,
            worker_pool_size = self.core.config.worker_pool_size,
            "Trigger engine started"
        );

        Ok(())
    }

    /// Stop the monitoring loop and drain the worker pool. Idempotent.
    pub async fn stop(&self) {
        let _lifecycle = self.lifecycle.lock().await;

        let (cancel, task) = {
            let mut state = self.state.lock();
            if !state.running {
                return;
            }
            state.running = false;
            (state.cancel.take(), state.task.take())
        };

        if let Some(cancel) = cancel {
            cancel.cancel();
        }

        if let Some(task) = task
            && let Err(e) = task.await
            && !e.is_cancelled()
        {
            tracing::error!(error = %e, "Monitoring task ended abnormally");
        }

        let drained = std::mem::replace(
            &mut *self.core.pool.lock(),
            Arc::new(WorkerPool::new(self.core.config.worker_pool_size)),
        );
        drained.shutdown().await;

        tracing::info!("Trigger engine stopped");
    }

    /// Re-register every pending convertible order from the store.
    ///
    /// Orders already registered are left alone so a restart does not
    /// duplicate them.
    async fn recover_pending_orders(&self) -> Result<usize, OrderStoreError> {
        let orders = self.core.store.load_pending_trigger_orders().await?;
        let mut recovered = 0;

        for order in &orders {
            if !self.core.converter.can_convert(order) {
                continue;
            }

            match self.register(order, true) {
                Ok(true) => recovered += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        order_id = %order.id,
                        error = %e,
                        "Skipping pending order during recovery"
                    );
                }
            }
        }

        tracing::info!(
            pending = orders.len(),
            recovered,
            "Recovered pending trigger orders"
        );

        Ok(recovered)
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Run one pass over every monitored symbol using fresh quotes.
    pub async fn check_triggers(&self) -> Vec<TriggerOutcome> {
        self.core.run_pass(None).await
    }

    /// Run one pass for `symbol` at a known price, without a quote fetch.
    pub async fn check_symbol_price(&self, symbol: &Symbol, price: Decimal) -> Vec<TriggerOutcome> {
        self.core.run_pass(Some((symbol.clone(), price))).await
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Snapshot of engine state and counters.
    #[must_use]
    pub fn get_status(&self) -> EngineStatus {
        let running = self.is_running();
        let registry = self.core.registry.lock();

        EngineStatus {
            running,
            monitored_symbols: registry.symbol_count(),
            total_conditions: registry.condition_count(),
            orders_processed: self.core.orders_processed.load(Ordering::SeqCst),
            orders_triggered: self.core.orders_triggered.load(Ordering::SeqCst),
            last_check_time: *self.core.last_pass_at.lock(),
            symbols: registry.monitored_symbols(),
        }
    }

    /// Every live condition, grouped by symbol.
    #[must_use]
    pub fn get_monitored_orders(&self) -> MonitoredOrders {
        let registry = self.core.registry.lock();
        registry
            .iter()
            .map(|(symbol, conditions)| {
                (
                    symbol.clone(),
                    conditions.iter().map(MonitoredOrder::from).collect(),
                )
            })
            .collect()
    }
}

impl<Q, C, S, E> std::fmt::Debug for OrderExecutionEngine<Q, C, S, E>
where
    Q: QuoteSourcePort,
    C: OrderConverterPort,
    S: TriggerOrderStorePort,
    E: ExecutionSinkPort,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderExecutionEngine")
            .field("config", &self.core.config)
            .field("running", &self.state.lock().running)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
