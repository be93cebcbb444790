use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::application::ports::{
    ConversionError, ExecutionSinkError, MockExecutionSinkPort, MockOrderConverterPort,
    MockQuoteSourcePort, MockTriggerOrderStorePort, Quote, QuoteSourceError,
};
use crate::domain::order::{ExecutableOrder, OrderSide, OrderType};
use crate::domain::shared::InstrumentId;
use crate::domain::trigger::TriggerType;

type MockEngine = OrderExecutionEngine<
    MockQuoteSourcePort,
    MockOrderConverterPort,
    MockTriggerOrderStorePort,
    MockExecutionSinkPort,
>;

fn engine(
    quotes: MockQuoteSourcePort,
    converter: MockOrderConverterPort,
    store: MockTriggerOrderStorePort,
    sink: MockExecutionSinkPort,
) -> MockEngine {
    OrderExecutionEngine::new(
        Arc::new(quotes),
        Arc::new(converter),
        Arc::new(store),
        Arc::new(sink),
    )
}

fn accepting_converter() -> MockOrderConverterPort {
    let mut converter = MockOrderConverterPort::new();
    converter.expect_can_convert().returning(|_| true);
    converter.expect_validate().returning(|_| Ok(()));
    converter
}

fn market_order(order: &ConditionalOrder, price: Decimal) -> ExecutableOrder {
    ExecutableOrder::market(
        order.id.clone(),
        order.symbol.clone(),
        OrderSide::Sell,
        order.quantity.abs(),
        price,
    )
}

fn store_with(order: ConditionalOrder) -> MockTriggerOrderStorePort {
    let mut store = MockTriggerOrderStorePort::new();
    store
        .expect_load_order()
        .returning(move |_| Ok(Some(order.clone())));
    store
}

fn aapl_stop() -> ConditionalOrder {
    ConditionalOrder::stop_loss("ord-1", "AAPL", dec!(10), dec!(145))
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn add_ignores_unconvertible_order() {
    let mut converter = MockOrderConverterPort::new();
    converter.expect_can_convert().returning(|_| false);
    converter.expect_validate().never();

    let engine = engine(
        MockQuoteSourcePort::new(),
        converter,
        MockTriggerOrderStorePort::new(),
        MockExecutionSinkPort::new(),
    );

    let order = ConditionalOrder::new("ord-1", "AAPL", OrderType::Market, dec!(10));
    assert!(!engine.add(&order).unwrap());
    assert_eq!(engine.get_status().total_conditions, 0);
}

#[test]
fn add_surfaces_validation_failure() {
    let mut converter = MockOrderConverterPort::new();
    converter.expect_can_convert().returning(|_| true);
    converter.expect_validate().returning(|order| {
        Err(ConversionError::MissingField {
            order_id: order.id.to_string(),
            field: "limit_price",
        })
    });

    let engine = engine(
        MockQuoteSourcePort::new(),
        converter,
        MockTriggerOrderStorePort::new(),
        MockExecutionSinkPort::new(),
    );

    let err = engine.add(&aapl_stop()).unwrap_err();
    assert!(matches!(err, TriggerError::ValidationFailed { .. }));
    assert!(engine.get_monitored_orders().is_empty());
}

#[test]
fn add_rejects_stop_without_price() {
    let engine = engine(
        MockQuoteSourcePort::new(),
        accepting_converter(),
        MockTriggerOrderStorePort::new(),
        MockExecutionSinkPort::new(),
    );

    let mut order = aapl_stop();
    order.stop_price = None;

    assert!(matches!(
        engine.add(&order),
        Err(TriggerError::MissingStopPrice { .. })
    ));
}

#[test]
fn add_and_remove_maintain_status() {
    let engine = engine(
        MockQuoteSourcePort::new(),
        accepting_converter(),
        MockTriggerOrderStorePort::new(),
        MockExecutionSinkPort::new(),
    );

    assert!(engine.add(&aapl_stop()).unwrap());
    assert!(
        engine
            .add(&ConditionalOrder::trailing_percent(
                "ord-2",
                "MSFT",
                dec!(5),
                dec!(2)
            ))
            .unwrap()
    );

    let status = engine.get_status();
    assert_eq!(status.monitored_symbols, 2);
    assert_eq!(status.total_conditions, 2);
    assert_eq!(status.symbols, vec![Symbol::new("AAPL"), Symbol::new("MSFT")]);
    assert!(!status.running);

    assert_eq!(engine.remove(&OrderId::new("ord-1")), 1);
    assert_eq!(engine.remove(&OrderId::new("ord-1")), 0);

    let orders = engine.get_monitored_orders();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[&Symbol::new("MSFT")][0].trigger_price, Decimal::ZERO);
}

// ============================================================================
// Processing
// ============================================================================

#[tokio::test]
async fn fired_stop_loss_is_persisted_then_executed() {
    let mut converter = accepting_converter();
    converter
        .expect_convert_stop_loss_to_market()
        .times(1)
        .returning(|order, price| Some(market_order(order, price)));

    let mut store = store_with(aapl_stop());
    store
        .expect_update_triggered_status()
        .withf(|id, price| id.as_str() == "ord-1" && *price == dec!(144))
        .times(1)
        .returning(|_, _| Ok(()));

    let mut sink = MockExecutionSinkPort::new();
    sink.expect_execute()
        .withf(|order| order.parent_order_id.as_str() == "ord-1")
        .times(1)
        .returning(|_| Ok(()));

    let engine = engine(MockQuoteSourcePort::new(), converter, store, sink);
    engine.add(&aapl_stop()).unwrap();

    let outcomes = engine.check_symbol_price(&Symbol::new("AAPL"), dec!(144)).await;

    assert_eq!(outcomes.len(), 1);
    assert!(matches!(
        &outcomes[0],
        TriggerOutcome::Executed {
            trigger_type: TriggerType::StopLoss,
            trigger_price,
            ..
        } if *trigger_price == dec!(144)
    ));

    let status = engine.get_status();
    assert_eq!(status.orders_processed, 1);
    assert_eq!(status.orders_triggered, 1);
    assert_eq!(status.total_conditions, 0);
    assert!(status.last_check_time.is_some());
}

#[tokio::test]
async fn price_above_stop_does_not_fire() {
    let engine = engine(
        MockQuoteSourcePort::new(),
        accepting_converter(),
        MockTriggerOrderStorePort::new(),
        MockExecutionSinkPort::new(),
    );
    engine.add(&aapl_stop()).unwrap();

    let outcomes = engine.check_symbol_price(&Symbol::new("AAPL"), dec!(146)).await;

    assert!(outcomes.is_empty());
    assert_eq!(engine.get_status().total_conditions, 1);
    assert!(engine.get_status().last_check_time.is_some());
}

#[tokio::test]
async fn missing_order_is_abandoned() {
    let mut converter = accepting_converter();
    converter.expect_convert_stop_loss_to_market().never();

    let mut store = MockTriggerOrderStorePort::new();
    store.expect_load_order().returning(|_| Ok(None));
    store.expect_update_triggered_status().never();

    let mut sink = MockExecutionSinkPort::new();
    sink.expect_execute().never();

    let engine = engine(MockQuoteSourcePort::new(), converter, store, sink);
    engine.add(&aapl_stop()).unwrap();

    let outcomes = engine.check_symbol_price(&Symbol::new("AAPL"), dec!(140)).await;

    assert_eq!(
        outcomes,
        vec![TriggerOutcome::OrderNotFound {
            order_id: OrderId::new("ord-1")
        }]
    );
    let status = engine.get_status();
    assert_eq!(status.orders_processed, 1);
    assert_eq!(status.orders_triggered, 0);
    assert_eq!(status.total_conditions, 0);
}

#[tokio::test]
async fn empty_conversion_has_no_side_effects() {
    let mut converter = accepting_converter();
    converter
        .expect_convert_stop_loss_to_market()
        .returning(|_, _| None);

    let mut store = store_with(aapl_stop());
    store.expect_update_triggered_status().never();

    let mut sink = MockExecutionSinkPort::new();
    sink.expect_execute().never();

    let engine = engine(MockQuoteSourcePort::new(), converter, store, sink);
    engine.add(&aapl_stop()).unwrap();

    let outcomes = engine.check_symbol_price(&Symbol::new("AAPL"), dec!(140)).await;

    assert!(matches!(
        outcomes.as_slice(),
        [TriggerOutcome::ConversionSkipped { .. }]
    ));
    assert_eq!(engine.get_status().orders_triggered, 0);
}

#[tokio::test]
async fn persist_failure_skips_execution() {
    let mut converter = accepting_converter();
    converter
        .expect_convert_stop_loss_to_market()
        .returning(|order, price| Some(market_order(order, price)));

    let mut store = store_with(aapl_stop());
    store.expect_update_triggered_status().returning(|id, _| {
        Err(OrderStoreError::Unavailable {
            message: format!("write failed for {id}"),
        })
    });

    let mut sink = MockExecutionSinkPort::new();
    sink.expect_execute().never();

    let engine = engine(MockQuoteSourcePort::new(), converter, store, sink);
    engine.add(&aapl_stop()).unwrap();

    let outcomes = engine.check_symbol_price(&Symbol::new("AAPL"), dec!(140)).await;

    assert!(matches!(
        outcomes.as_slice(),
        [TriggerOutcome::Failed {
            stage: ProcessingStage::Persist,
            ..
        }]
    ));
    assert_eq!(engine.get_status().orders_triggered, 0);
}

#[tokio::test]
async fn sink_failure_leaves_triggered_counter_unchanged() {
    let mut converter = accepting_converter();
    converter
        .expect_convert_stop_loss_to_market()
        .returning(|order, price| Some(market_order(order, price)));

    let mut store = store_with(aapl_stop());
    store
        .expect_update_triggered_status()
        .returning(|_, _| Ok(()));

    let mut sink = MockExecutionSinkPort::new();
    sink.expect_execute().returning(|order| {
        Err(ExecutionSinkError::Rejected {
            order_id: order.id.to_string(),
            reason: "market closed".to_string(),
        })
    });

    let engine = engine(MockQuoteSourcePort::new(), converter, store, sink);
    engine.add(&aapl_stop()).unwrap();

    let outcomes = engine.check_symbol_price(&Symbol::new("AAPL"), dec!(140)).await;

    assert!(matches!(
        outcomes.as_slice(),
        [TriggerOutcome::Failed {
            stage: ProcessingStage::Execute,
            ..
        }]
    ));
    let status = engine.get_status();
    assert_eq!(status.orders_processed, 1);
    assert_eq!(status.orders_triggered, 0);
}

#[tokio::test]
async fn converter_panic_is_contained() {
    let mut converter = accepting_converter();
    converter
        .expect_convert_stop_loss_to_market()
        .returning(|_, _| panic!("converter bug"));

    let mut store = store_with(aapl_stop());
    store.expect_update_triggered_status().never();

    let engine = engine(
        MockQuoteSourcePort::new(),
        converter,
        store,
        MockExecutionSinkPort::new(),
    );
    engine.add(&aapl_stop()).unwrap();

    let outcomes = engine.check_symbol_price(&Symbol::new("AAPL"), dec!(140)).await;

    assert!(matches!(
        outcomes.as_slice(),
        [TriggerOutcome::Failed {
            stage: ProcessingStage::Conversion,
            ..
        }]
    ));
}

#[tokio::test]
async fn stop_limit_dispatches_to_limit_conversion() {
    let order = ConditionalOrder::stop_limit("ord-7", "SPY", dec!(-3), dec!(500), dec!(501));

    let mut converter = accepting_converter();
    converter
        .expect_convert_stop_limit_to_limit()
        .times(1)
        .returning(|order, price| {
            Some(ExecutableOrder::limit(
                order.id.clone(),
                order.symbol.clone(),
                OrderSide::Buy,
                order.quantity.abs(),
                dec!(501),
                price,
            ))
        });
    converter.expect_convert_stop_loss_to_market().never();

    let mut store = store_with(order.clone());
    store
        .expect_update_triggered_status()
        .returning(|_, _| Ok(()));

    let mut sink = MockExecutionSinkPort::new();
    sink.expect_execute()
        .withf(|o| o.order_type == OrderType::Limit)
        .returning(|_| Ok(()));

    let engine = engine(MockQuoteSourcePort::new(), converter, store, sink);
    engine.add(&order).unwrap();

    // Negative quantity resolves to a buy-side trigger under the default policy.
    let outcomes = engine.check_symbol_price(&Symbol::new("SPY"), dec!(500)).await;
    assert!(outcomes[0].is_executed());
}

// ============================================================================
// Evaluation pass
// ============================================================================

#[tokio::test]
async fn failing_symbol_does_not_block_others() {
    let mut quotes = MockQuoteSourcePort::new();
    quotes.expect_resolve_instrument().returning(|symbol| {
        if symbol.as_str() == "BAD" {
            Err(QuoteSourceError::InstrumentNotFound {
                symbol: symbol.to_string(),
            })
        } else {
            Ok(InstrumentId::new(symbol.as_str()))
        }
    });
    quotes.expect_get_quote().returning(|instrument| {
        Ok(Some(Quote::last(
            Symbol::new(instrument.as_str()),
            instrument.clone(),
            dec!(140),
        )))
    });

    let mut converter = accepting_converter();
    converter
        .expect_convert_stop_loss_to_market()
        .returning(|order, price| Some(market_order(order, price)));

    let mut store = store_with(aapl_stop());
    store
        .expect_update_triggered_status()
        .returning(|_, _| Ok(()));

    let mut sink = MockExecutionSinkPort::new();
    sink.expect_execute().times(1).returning(|_| Ok(()));

    let engine = engine(quotes, converter, store, sink);
    engine.add(&aapl_stop()).unwrap();
    engine
        .add(&ConditionalOrder::stop_loss("ord-bad", "BAD", dec!(1), dec!(150)))
        .unwrap();

    let outcomes = engine.check_triggers().await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].order_id().as_str(), "ord-1");
    let status = engine.get_status();
    assert_eq!(status.symbols, vec![Symbol::new("BAD")]);
    assert_eq!(status.total_conditions, 1);
}

#[tokio::test]
async fn quote_without_price_is_skipped() {
    let mut quotes = MockQuoteSourcePort::new();
    quotes
        .expect_resolve_instrument()
        .returning(|symbol| Ok(InstrumentId::new(symbol.as_str())));
    quotes.expect_get_quote().returning(|instrument| {
        Ok(Some(Quote {
            last_price: None,
            ..Quote::last(Symbol::new("AAPL"), instrument.clone(), Decimal::ZERO)
        }))
    });

    let engine = engine(
        quotes,
        accepting_converter(),
        MockTriggerOrderStorePort::new(),
        MockExecutionSinkPort::new(),
    );
    engine.add(&aapl_stop()).unwrap();

    assert!(engine.check_triggers().await.is_empty());
    assert_eq!(engine.get_status().total_conditions, 1);
}

#[tokio::test]
async fn empty_registry_pass_skips_quote_source() {
    let mut quotes = MockQuoteSourcePort::new();
    quotes.expect_resolve_instrument().never();

    let engine = engine(
        quotes,
        accepting_converter(),
        MockTriggerOrderStorePort::new(),
        MockExecutionSinkPort::new(),
    );

    assert!(engine.check_triggers().await.is_empty());
    assert!(engine.get_status().last_check_time.is_some());
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn start_fails_when_recovery_cannot_load() {
    let mut store = MockTriggerOrderStorePort::new();
    store.expect_load_pending_trigger_orders().returning(|| {
        Err(OrderStoreError::Unavailable {
            message: "connection refused".to_string(),
        })
    });

    let engine = engine(
        MockQuoteSourcePort::new(),
        accepting_converter(),
        store,
        MockExecutionSinkPort::new(),
    );

    assert!(engine.start().await.is_err());
    assert!(!engine.is_running());

    // Stopping a never-started engine is a no-op.
    engine.stop().await;
    assert!(!engine.is_running());
}

#[tokio::test]
async fn start_recovers_pending_orders_once() {
    let mut store = MockTriggerOrderStorePort::new();
    store.expect_load_pending_trigger_orders().returning(|| {
        let mut broken = ConditionalOrder::stop_loss("ord-2", "MSFT", dec!(1), dec!(400));
        broken.stop_price = None;
        Ok(vec![aapl_stop(), broken])
    });

    let mut quotes = MockQuoteSourcePort::new();
    quotes
        .expect_resolve_instrument()
        .returning(|symbol| Ok(InstrumentId::new(symbol.as_str())));
    quotes.expect_get_quote().returning(|_| Ok(None));

    let engine = engine(
        quotes,
        accepting_converter(),
        store,
        MockExecutionSinkPort::new(),
    );

    engine.start().await.unwrap();
    assert!(engine.is_running());
    assert_eq!(engine.get_status().total_conditions, 1);

    engine.stop().await;
    engine.start().await.unwrap();
    assert_eq!(engine.get_status().total_conditions, 1);

    engine.stop().await;
    assert!(!engine.is_running());
}

#[tokio::test]
async fn recovery_does_not_duplicate_externally_added_order() {
    let mut store = MockTriggerOrderStorePort::new();
    store
        .expect_load_pending_trigger_orders()
        .returning(|| Ok(vec![aapl_stop()]));

    let mut quotes = MockQuoteSourcePort::new();
    quotes
        .expect_resolve_instrument()
        .returning(|symbol| Ok(InstrumentId::new(symbol.as_str())));
    quotes.expect_get_quote().returning(|_| Ok(None));

    let engine = engine(
        quotes,
        accepting_converter(),
        store,
        MockExecutionSinkPort::new(),
    );

    assert!(engine.add(&aapl_stop()).unwrap());
    engine.start().await.unwrap();

    let status = engine.get_status();
    assert_eq!(status.total_conditions, 1);
    assert_eq!(
        engine.get_monitored_orders()[&Symbol::new("AAPL")].len(),
        1
    );

    engine.stop().await;
}
