//! Quote Source Port (Driven Port)
//!
//! Interface for fetching the latest price of a monitored symbol.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::shared::{InstrumentId, Symbol, Timestamp};

/// Latest market snapshot for an instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol the quote belongs to.
    pub symbol: Symbol,
    /// Resolved instrument.
    pub instrument: InstrumentId,
    /// Last traded price. Absent when the upstream has no print yet.
    pub last_price: Option<Decimal>,
    /// Quote timestamp.
    pub timestamp: Timestamp,
}

impl Quote {
    /// Create a quote carrying only a last price.
    #[must_use]
    pub fn last(symbol: Symbol, instrument: InstrumentId, last_price: Decimal) -> Self {
        Self {
            symbol,
            instrument,
            last_price: Some(last_price),
            timestamp: Timestamp::now(),
        }
    }
}

/// Quote source error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QuoteSourceError {
    /// Symbol does not map to a tradable instrument.
    #[error("instrument not found for symbol: {symbol}")]
    InstrumentNotFound {
        /// The unknown symbol.
        symbol: String,
    },

    /// Upstream connection or request failure.
    #[error("quote source connection error: {message}")]
    ConnectionError {
        /// Error details.
        message: String,
    },
}

/// Port for resolving instruments and fetching quotes.
///
/// Must be safe to call concurrently for many instruments.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteSourcePort: Send + Sync {
    /// Resolve the tradable instrument for a symbol.
    async fn resolve_instrument(&self, symbol: &Symbol) -> Result<InstrumentId, QuoteSourceError>;

    /// Get the latest quote for an instrument, if one is available.
    async fn get_quote(&self, instrument: &InstrumentId) -> Result<Option<Quote>, QuoteSourceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn last_quote_carries_price() {
        let quote = Quote::last(Symbol::new("AAPL"), InstrumentId::new("AAPL"), dec!(150));

        assert_eq!(quote.symbol, Symbol::new("AAPL"));
        assert_eq!(quote.last_price, Some(dec!(150)));
    }

    #[test]
    fn quote_without_price_deserializes() {
        let json = r#"{
            "symbol": "AAPL",
            "instrument": "AAPL",
            "last_price": null,
            "timestamp": "2026-01-19T15:30:00Z"
        }"#;

        let quote: Quote = serde_json::from_str(json).unwrap();
        assert!(quote.last_price.is_none());
    }
}
