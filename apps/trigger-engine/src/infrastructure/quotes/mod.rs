//! Quote Source Adapters

pub mod static_source;

pub use static_source::StaticQuoteSource;
