//! Application Layer
//!
//! Orchestrates the domain through:
//!
//! - **Ports**: Interfaces for the quote source, order converter, order store
//!   and execution sink
//! - **Services**: The trigger engine and its worker pool

pub mod ports;
pub mod services;

pub use ports::*;
pub use services::*;
