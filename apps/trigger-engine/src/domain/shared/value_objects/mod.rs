//! Shared Value Objects
//!
//! Value objects are compared by value, not identity.

mod identifiers;
mod symbol;
mod timestamp;

pub use identifiers::{InstrumentId, OrderId};
pub use symbol::Symbol;
pub use timestamp::Timestamp;
