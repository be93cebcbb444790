//! Static quote source.
//!
//! Prices are set by hand. Used by the standalone binary and tests; failures
//! can be injected per symbol.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;
use rust_decimal::Decimal;

use crate::application::ports::{Quote, QuoteSourceError, QuoteSourcePort};
use crate::domain::shared::{InstrumentId, Symbol};

#[derive(Debug, Default)]
struct Book {
    // None means a quote exists but carries no price.
    prices: HashMap<Symbol, Option<Decimal>>,
    unresolvable: HashSet<Symbol>,
    failing: HashSet<Symbol>,
}

/// Quote source backed by hand-set prices.
///
/// Instruments resolve to the symbol itself.
#[derive(Debug, Default)]
pub struct StaticQuoteSource {
    book: RwLock<Book>,
    quote_requests: AtomicUsize,
}

impl StaticQuoteSource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the last price for a symbol.
    pub fn set_price(&self, symbol: impl Into<Symbol>, price: Decimal) {
        self.book.write().prices.insert(symbol.into(), Some(price));
    }

    /// Publish a quote with no last price.
    pub fn set_unpriced(&self, symbol: impl Into<Symbol>) {
        self.book.write().prices.insert(symbol.into(), None);
    }

    /// Remove the quote so lookups return nothing.
    pub fn clear(&self, symbol: impl Into<Symbol>) {
        self.book.write().prices.remove(&symbol.into());
    }

    /// Make instrument resolution fail for a symbol.
    pub fn fail_resolution(&self, symbol: impl Into<Symbol>) {
        self.book.write().unresolvable.insert(symbol.into());
    }

    /// Make quote fetches fail for a symbol.
    pub fn fail_quotes(&self, symbol: impl Into<Symbol>) {
        self.book.write().failing.insert(symbol.into());
    }

    /// Clear all injected failures.
    pub fn heal(&self) {
        let mut book = self.book.write();
        book.unresolvable.clear();
        book.failing.clear();
    }

    /// Number of `get_quote` calls served.
    #[must_use]
    pub fn quote_requests(&self) -> usize {
        self.quote_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuoteSourcePort for StaticQuoteSource {
    async fn resolve_instrument(&self, symbol: &Symbol) -> Result<InstrumentId, QuoteSourceError> {
        if self.book.read().unresolvable.contains(symbol) {
            return Err(QuoteSourceError::InstrumentNotFound {
                symbol: symbol.to_string(),
            });
        }
        Ok(InstrumentId::new(symbol.as_str()))
    }

    async fn get_quote(&self, instrument: &InstrumentId) -> Result<Option<Quote>, QuoteSourceError> {
        self.quote_requests.fetch_add(1, Ordering::SeqCst);

        let symbol = Symbol::new(instrument.as_str());
        let book = self.book.read();

        if book.failing.contains(&symbol) {
            return Err(QuoteSourceError::ConnectionError {
                message: format!("injected failure for {symbol}"),
            });
        }

        Ok(book.prices.get(&symbol).map(|price| Quote {
            last_price: *price,
            ..Quote::last(symbol.clone(), instrument.clone(), Decimal::ZERO)
        }))
    }
}
