//! # cord-common
//!
//! Shared utilities including configuration, error handling, the bot token, and telemetry.

pub mod auth;
pub mod config;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{Token, TokenType};
pub use config::{
    CacheConfig, ClientConfig, ConfigError, Environment, GatewayConfig, RestConfig,
};
pub use error::{ClientError, ClientResult};
pub use telemetry::{
    init_tracing, init_tracing_with_config, try_init_tracing, try_init_tracing_with_config,
    TracingConfig, TracingError,
};
