//! Order Converter Adapters

pub mod standard;

pub use standard::StandardOrderConverter;
