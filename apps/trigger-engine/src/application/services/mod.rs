//! Application Services
//!
//! Long-running orchestration: the trigger engine and its blocking worker pool.

pub mod order_execution_engine;
mod worker_pool;

pub use order_execution_engine::{
    EngineConfig, EngineStatus, MonitoredOrder, MonitoredOrders, OrderExecutionEngine,
    ProcessingStage, TriggerOutcome,
};
pub use worker_pool::{WorkerPool, WorkerPoolError};
