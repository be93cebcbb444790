//! Order Context
//!
//! The conditional order records this engine watches, and the executable
//! orders it produces when a trigger fires. The engine reads conditional orders
//! and writes back a single terminal transition; it never owns their lifecycle.

mod conditional_order;
mod executable_order;
pub mod value_objects;

pub use conditional_order::ConditionalOrder;
pub use executable_order::ExecutableOrder;
pub use value_objects::{OrderSide, OrderStatus, OrderType};
