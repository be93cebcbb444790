//! Domain Layer
//!
//! Business logic with zero infrastructure dependencies.
//!
//! # Bounded Contexts
//!
//! - [`order`]: Conditional orders read from persistence and the executable
//!   orders produced when they fire
//! - [`trigger`]: Trigger conditions, trailing-stop repricing, and the
//!   symbol-keyed registry
//! - [`shared`]: Identifiers, symbols, timestamps

pub mod order;
pub mod shared;
pub mod trigger;
