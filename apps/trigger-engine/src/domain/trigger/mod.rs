//! Trigger Bounded Context
//!
//! In-memory watch entries derived from conditional orders, the predicate and
//! trailing-stop repricing logic that decides when they fire, and the
//! symbol-keyed registry the engine evaluates on every pass.

pub mod errors;
mod registry;
mod trigger_condition;
pub mod value_objects;

pub use errors::TriggerError;
pub use registry::TriggerRegistry;
pub use trigger_condition::TriggerCondition;
pub use value_objects::{TrailMethod, TriggerSidePolicy, TriggerType};
