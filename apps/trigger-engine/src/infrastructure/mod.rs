//! Infrastructure Layer
//!
//! Reference adapters for the application ports. They let the binary run
//! standalone and back the integration tests.
//!
//! - `persistence/`: In-memory conditional order store
//! - `quotes/`: Hand-set quote source with failure injection
//! - `converter/`: Stop, stop-limit and trailing-stop conversion
//! - `execution/`: Execution sink that records and logs orders

pub mod converter;
pub mod execution;
pub mod persistence;
pub mod quotes;

pub use converter::StandardOrderConverter;
pub use execution::LoggingExecutionSink;
pub use persistence::InMemoryOrderStore;
pub use quotes::StaticQuoteSource;
