//! Error types for the core layer

mod argument_error;

pub use argument_error::ArgumentError;
