//! Trigger Value Objects

mod side_policy;
mod trail_method;
mod trigger_type;

pub use side_policy::TriggerSidePolicy;
pub use trail_method::TrailMethod;
pub use trigger_type::TriggerType;
