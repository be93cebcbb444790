//! Monitoring loop and evaluation pass.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use super::{EngineCore, TriggerOutcome};
use crate::application::ports::{
    ExecutionSinkPort, OrderConverterPort, QuoteSourcePort, TriggerOrderStorePort,
};
use crate::domain::shared::{Symbol, Timestamp};
use crate::observability;

/// Drive evaluation passes until `cancel` fires.
///
/// Each pass runs as its own task so a panic inside it surfaces as a
/// `JoinError` here; the loop answers it with the error back-off. A pass still
/// running when `cancel` fires is aborted, abandoning at most the triggers it
/// was processing.
pub(super) async fn run_monitoring_loop<Q, C, S, E>(
    core: Arc<EngineCore<Q, C, S, E>>,
    cancel: CancellationToken,
) where
    Q: QuoteSourcePort + 'static,
    C: OrderConverterPort + 'static,
    S: TriggerOrderStorePort + 'static,
    E: ExecutionSinkPort + 'static,
{
    tracing::info!("Monitoring loop started");

    loop {
        let mut pass = {
            let core = Arc::clone(&core);
            tokio::spawn(async move {
                core.run_pass(None).await;
            })
        };

        let joined = tokio::select! {
            () = cancel.cancelled() => {
                pass.abort();
                if let Err(e) = pass.await
                    && !e.is_cancelled()
                {
                    tracing::error!(error = %e, "Evaluation pass failed during shutdown");
                }
                tracing::info!("Aborted in-flight evaluation pass");
                break;
            }
            joined = &mut pass => joined,
        };

        let delay = match joined {
            Ok(()) => core.config.poll_interval,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    backoff_ms = core.config.error_backoff.as_millis() as u64,
                    "Evaluation pass failed"
                );
                core.config.error_backoff
            }
        };

        tokio::select! {
            () = cancel.cancelled() => break,
            () = tokio::time::sleep(delay) => {}
        }
    }

    tracing::info!("Monitoring loop stopped");
}

/// Stamps the pass completion time even if the pass unwinds.
struct PassCompletion<'a> {
    last_pass_at: &'a parking_lot::Mutex<Option<Timestamp>>,
    started: Instant,
}

impl Drop for PassCompletion<'_> {
    fn drop(&mut self) {
        *self.last_pass_at.lock() = Some(Timestamp::now());
        observability::record_pass_duration(self.started.elapsed().as_secs_f64());
    }
}

impl<Q, C, S, E> EngineCore<Q, C, S, E>
where
    Q: QuoteSourcePort + 'static,
    C: OrderConverterPort + 'static,
    S: TriggerOrderStorePort + 'static,
    E: ExecutionSinkPort + 'static,
{
    /// One evaluation pass.
    ///
    /// With `explicit`, only that symbol is evaluated at the given price.
    /// Otherwise every monitored symbol is priced from the quote source.
    pub(super) async fn run_pass(&self, explicit: Option<(Symbol, Decimal)>) -> Vec<TriggerOutcome> {
        let _completion = PassCompletion {
            last_pass_at: &self.last_pass_at,
            started: Instant::now(),
        };

        let symbols = self.registry.lock().monitored_symbols();
        if symbols.is_empty() {
            return Vec::new();
        }

        let prices: Vec<(Symbol, Decimal)> = match explicit {
            Some(pair) => vec![pair],
            None => {
                let lookups = symbols.into_iter().map(|symbol| async move {
                    let price = self.latest_price(&symbol).await;
                    price.map(|p| (symbol, p))
                });
                join_all(lookups).await.into_iter().flatten().collect()
            }
        };

        let mut outcomes = Vec::new();

        for (symbol, price) in prices {
            let fired = {
                let mut registry = self.registry.lock();
                let fired = registry.evaluate(&symbol, price);
                if !fired.is_empty() {
                    observability::update_monitored_symbols(registry.symbol_count());
                }
                fired
            };

            for condition in fired {
                tracing::info!(
                    order_id = %condition.order_id(),
                    symbol = %symbol,
                    trigger_type = %condition.trigger_type(),
                    trigger_price = %condition.trigger_price(),
                    current_price = %price,
                    "Trigger fired"
                );
                observability::record_condition_fired(condition.trigger_type().as_str());

                outcomes.push(self.process_triggered(condition, price).await);
            }
        }

        outcomes
    }

    /// Latest price for `symbol`, or `None` if it should be skipped this pass.
    async fn latest_price(&self, symbol: &Symbol) -> Option<Decimal> {
        let instrument = match self.quotes.resolve_instrument(symbol).await {
            Ok(instrument) => instrument,
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Instrument lookup failed, skipping");
                return None;
            }
        };

        match self.quotes.get_quote(&instrument).await {
            Ok(Some(quote)) => {
                if quote.last_price.is_none() {
                    tracing::debug!(symbol = %symbol, "Quote has no price, skipping");
                }
                quote.last_price
            }
            Ok(None) => {
                tracing::debug!(symbol = %symbol, "No quote available, skipping");
                None
            }
            Err(e) => {
                tracing::warn!(symbol = %symbol, error = %e, "Quote fetch failed, skipping");
                None
            }
        }
    }
}
