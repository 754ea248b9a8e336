//! # cord-gateway
//!
//! Gateway connection for real-time events.
//!
//! A [`Shard`] holds one WebSocket connection: it identifies (or resumes),
//! heartbeats, and reconnects with backoff. Every dispatch is applied to the
//! cache by the [`CacheUpdater`] and published as a [`GatewayEvent`] on a
//! broadcast channel. [`GatewayClient`] ties the shard, the cache and the
//! REST client together.

pub mod cache_updater;
pub mod client;
pub mod error;
pub mod events;
pub mod protocol;
pub mod shard;

pub use cache_updater::CacheUpdater;
pub use client::GatewayClient;
pub use error::{GatewayError, GatewayResult};
pub use events::{GatewayEvent, GatewayEventType};
pub use protocol::{CloseCode, GatewayMessage, Intents, OpCode};
pub use shard::{Backoff, SessionState, Shard, ShardOptions, ShardStatus};
