//! Triggered-order processing: load, convert, persist, execute.
//!
//! The condition has already left the registry when processing starts, so
//! every failure here abandons that trigger. Failures are logged and reported
//! as a [`TriggerOutcome`], never propagated.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use rust_decimal::Decimal;

use super::EngineCore;
use crate::application::ports::{
    ExecutionSinkPort, OrderConverterPort, QuoteSourcePort, TriggerOrderStorePort,
};
use crate::domain::order::{ConditionalOrder, ExecutableOrder};
use crate::domain::shared::OrderId;
use crate::domain::trigger::{TriggerCondition, TriggerType};
use crate::observability;

/// Step of the pipeline that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    /// Reloading the original order.
    LoadOrder,
    /// Running the converter on the worker pool.
    Conversion,
    /// Writing the terminal status.
    Persist,
    /// Handing the converted order to the sink.
    Execute,
}

impl ProcessingStage {
    /// Metrics label.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LoadOrder => "load_failed",
            Self::Conversion => "conversion_failed",
            Self::Persist => "persist_failed",
            Self::Execute => "execution_failed",
        }
    }
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of processing one fired condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Persisted and handed to the execution sink.
    Executed {
        /// Original conditional order.
        order_id: OrderId,
        /// Converted order handed to the sink.
        executed_order_id: OrderId,
        /// Trigger type of the fired condition.
        trigger_type: TriggerType,
        /// Price that fired the trigger.
        trigger_price: Decimal,
    },
    /// The original order no longer exists.
    OrderNotFound {
        /// Missing order.
        order_id: OrderId,
    },
    /// The converter produced nothing. No side effects.
    ConversionSkipped {
        /// Original conditional order.
        order_id: OrderId,
    },
    /// A pipeline step failed.
    Failed {
        /// Original conditional order.
        order_id: OrderId,
        /// Step that failed.
        stage: ProcessingStage,
        /// Error details.
        message: String,
    },
}

impl TriggerOutcome {
    /// Order the outcome refers to.
    #[must_use]
    pub const fn order_id(&self) -> &OrderId {
        match self {
            Self::Executed { order_id, .. }
            | Self::OrderNotFound { order_id }
            | Self::ConversionSkipped { order_id }
            | Self::Failed { order_id, .. } => order_id,
        }
    }

    /// Whether the converted order reached the sink.
    #[must_use]
    pub const fn is_executed(&self) -> bool {
        matches!(self, Self::Executed { .. })
    }

    fn failure_reason(&self) -> Option<&'static str> {
        match self {
            Self::Executed { .. } => None,
            Self::OrderNotFound { .. } => Some("order_not_found"),
            Self::ConversionSkipped { .. } => Some("conversion_empty"),
            Self::Failed { stage, .. } => Some(stage.as_str()),
        }
    }
}

fn convert<C: OrderConverterPort + ?Sized>(
    converter: &C,
    trigger_type: TriggerType,
    order: &ConditionalOrder,
    trigger_price: Decimal,
) -> Option<ExecutableOrder> {
    match trigger_type {
        TriggerType::StopLoss => converter.convert_stop_loss_to_market(order, trigger_price),
        TriggerType::StopLimit => converter.convert_stop_limit_to_limit(order, trigger_price),
        TriggerType::TrailingStop => {
            converter.convert_trailing_stop_to_market(order, trigger_price)
        }
    }
}

impl<Q, C, S, E> EngineCore<Q, C, S, E>
where
    Q: QuoteSourcePort + 'static,
    C: OrderConverterPort + 'static,
    S: TriggerOrderStorePort + 'static,
    E: ExecutionSinkPort + 'static,
{
    /// Process one fired condition at `trigger_price`.
    pub(super) async fn process_triggered(
        &self,
        condition: TriggerCondition,
        trigger_price: Decimal,
    ) -> TriggerOutcome {
        self.orders_processed.fetch_add(1, Ordering::SeqCst);

        let outcome = self.execute_pipeline(&condition, trigger_price).await;

        match &outcome {
            TriggerOutcome::Executed {
                order_id,
                executed_order_id,
                trigger_type,
                trigger_price,
            } => {
                self.orders_triggered.fetch_add(1, Ordering::SeqCst);
                observability::record_order_executed(trigger_type.as_str());
                tracing::info!(
                    order_id = %order_id,
                    executed_order_id = %executed_order_id,
                    trigger_type = %trigger_type,
                    trigger_price = %trigger_price,
                    "Triggered order executed"
                );
            }
            TriggerOutcome::OrderNotFound { order_id } => {
                tracing::warn!(order_id = %order_id, "Triggered order not found, abandoning");
            }
            TriggerOutcome::ConversionSkipped { order_id } => {
                tracing::warn!(order_id = %order_id, "Conversion produced no order, abandoning");
            }
            TriggerOutcome::Failed {
                order_id,
                stage,
                message,
            } => {
                tracing::error!(
                    order_id = %order_id,
                    stage = %stage,
                    error = %message,
                    "Triggered order processing failed"
                );
            }
        }

        if let Some(reason) = outcome.failure_reason() {
            observability::record_processing_failure(reason);
        }

        outcome
    }

    async fn execute_pipeline(
        &self,
        condition: &TriggerCondition,
        trigger_price: Decimal,
    ) -> TriggerOutcome {
        let order_id = condition.order_id().clone();
        let trigger_type = condition.trigger_type();

        let order = match self.store.load_order(&order_id).await {
            Ok(Some(order)) => order,
            Ok(None) => return TriggerOutcome::OrderNotFound { order_id },
            Err(e) => {
                return TriggerOutcome::Failed {
                    order_id,
                    stage: ProcessingStage::LoadOrder,
                    message: e.to_string(),
                };
            }
        };

        let converter = Arc::clone(&self.converter);
        let converted = match self
            .pool()
            .run(move || convert(converter.as_ref(), trigger_type, &order, trigger_price))
            .await
        {
            Ok(Some(converted)) => converted,
            Ok(None) => return TriggerOutcome::ConversionSkipped { order_id },
            Err(e) => {
                return TriggerOutcome::Failed {
                    order_id,
                    stage: ProcessingStage::Conversion,
                    message: e.to_string(),
                };
            }
        };

        if let Err(e) = self
            .store
            .update_triggered_status(&order_id, trigger_price)
            .await
        {
            return TriggerOutcome::Failed {
                order_id,
                stage: ProcessingStage::Persist,
                message: e.to_string(),
            };
        }

        if let Err(e) = self.sink.execute(&converted).await {
            return TriggerOutcome::Failed {
                order_id,
                stage: ProcessingStage::Execute,
                message: e.to_string(),
            };
        }

        TriggerOutcome::Executed {
            order_id,
            executed_order_id: converted.id,
            trigger_type,
            trigger_price,
        }
    }
}
