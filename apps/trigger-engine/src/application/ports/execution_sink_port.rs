//! Execution Sink Port (Driven Port)
//!
//! Downstream fulfilment of converted orders. The sink owns its retry policy.

use async_trait::async_trait;

use crate::domain::order::ExecutableOrder;

/// Execution sink error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExecutionSinkError {
    /// The sink refused the order.
    #[error("order {order_id} rejected: {reason}")]
    Rejected {
        /// Converted order id.
        order_id: String,
        /// Rejection reason.
        reason: String,
    },

    /// The sink could not be reached.
    #[error("execution sink unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },
}

/// Port for submitting converted orders.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExecutionSinkPort: Send + Sync {
    /// Submit an executable order.
    async fn execute(&self, order: &ExecutableOrder) -> Result<(), ExecutionSinkError>;
}
