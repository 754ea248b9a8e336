//! # cord-cache
//!
//! In-memory cache of gateway state.
//!
//! ## Features
//!
//! - **Shared entities**: every cached entity wraps an `Arc<RwLock<Model>>`,
//!   so a handle taken before an update observes the update
//! - **Keyed collections**: `DashMap` collections keyed by snowflake; an
//!   upsert merges into the existing entry instead of adding a second one
//! - **Bounded messages**: a per-channel ring of recent messages
//! - **Provider trait**: [`CacheProvider`] is the seam the gateway's cache
//!   updater writes through
//!
//! ## Example
//!
//! ```ignore
//! use cord_cache::{CacheProvider, MemoryCache};
//!
//! let cache = MemoryCache::new(100);
//! let first = cache.upsert_guild(&guild).entity;
//! let second = cache.upsert_guild(&renamed_guild);
//!
//! // Same entry, updated in place
//! assert_eq!(first.name(), renamed_guild.name);
//! assert_eq!(second.old.unwrap().name, guild.name);
//! ```

pub mod entities;
pub mod provider;
pub mod store;

// Re-export entity types
pub use entities::{
    CachedChannel, CachedGuild, CachedGuildChannel, CachedMember, CachedMessage,
    CachedPrivateChannel, CachedRole, CachedUser, Shared,
};

// Re-export provider types
pub use provider::{CacheProvider, CacheStats, RemovedGuild, SharedCache, Upsert};

// Re-export the default store
pub use store::{MemoryCache, MessageRing, DEFAULT_MESSAGE_CACHE_SIZE};
