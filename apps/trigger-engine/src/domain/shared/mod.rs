//! Shared Domain Types
//!
//! Value objects shared by the order and trigger contexts.

pub mod value_objects;

pub use value_objects::{InstrumentId, OrderId, Symbol, Timestamp};
