//! Cache provider trait
//!
//! The gateway's cache updater writes through this trait; lookups are on the
//! same trait so applications can swap in their own store.

use std::sync::Arc;

use cord_core::models::{
    ChannelModel, GuildModel, MemberModel, MessageModel, PartialMessageModel, RoleModel,
    UserModel,
};
use cord_core::Snowflake;

use crate::entities::{
    CachedChannel, CachedGuild, CachedMember, CachedMessage, CachedRole, CachedUser,
};

/// Result of an upsert
///
/// `old` is the state before the write, `None` when the entry was created.
#[derive(Debug, Clone)]
pub struct Upsert<E, M> {
    pub entity: E,
    pub old: Option<M>,
}

impl<E, M> Upsert<E, M> {
    pub fn created(entity: E) -> Self {
        Self { entity, old: None }
    }

    pub fn updated(entity: E, old: M) -> Self {
        Self {
            entity,
            old: Some(old),
        }
    }

    pub fn is_created(&self) -> bool {
        self.old.is_none()
    }
}

/// Everything dropped with a guild
#[derive(Debug, Clone)]
pub struct RemovedGuild {
    pub guild: Option<CachedGuild>,
    pub channels: Vec<CachedChannel>,
    pub members: Vec<CachedMember>,
    pub roles: Vec<CachedRole>,
}

/// Entry counts per collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub guilds: usize,
    pub unavailable_guilds: usize,
    pub channels: usize,
    pub users: usize,
    pub members: usize,
    pub roles: usize,
    pub messages: usize,
}

/// Cache shared between the gateway client and the application
pub type SharedCache = Arc<dyn CacheProvider>;

pub trait CacheProvider: Send + Sync {
    // ========================================================================
    // Current user
    // ========================================================================

    fn current_user(&self) -> Option<CachedUser>;

    /// Set the bot's own user from `READY`; also cached as a regular user
    fn set_current_user(&self, model: &UserModel) -> CachedUser;

    // ========================================================================
    // Users
    // ========================================================================

    fn user(&self, user_id: Snowflake) -> Option<CachedUser>;

    fn upsert_user(&self, model: &UserModel) -> Upsert<CachedUser, UserModel>;

    // ========================================================================
    // Guilds
    // ========================================================================

    fn guild(&self, guild_id: Snowflake) -> Option<CachedGuild>;

    fn guilds(&self) -> Vec<CachedGuild>;

    /// Insert or merge guild-level fields; clears the unavailable mark
    fn upsert_guild(&self, model: &GuildModel) -> Upsert<CachedGuild, GuildModel>;

    /// Remove a guild with its channels, members, roles and their messages
    fn remove_guild(&self, guild_id: Snowflake) -> RemovedGuild;

    /// Record a guild as unavailable (outage, or not yet streamed in)
    fn mark_unavailable(&self, guild_id: Snowflake);

    fn is_unavailable(&self, guild_id: Snowflake) -> bool;

    // ========================================================================
    // Channels
    // ========================================================================

    fn channel(&self, channel_id: Snowflake) -> Option<CachedChannel>;

    fn guild_channels(&self, guild_id: Snowflake) -> Vec<CachedChannel>;

    /// `guild_id` fills in a guild channel payload that omitted it;
    /// `None` when a guild channel kind has no guild id at all
    fn upsert_channel(
        &self,
        guild_id: Option<Snowflake>,
        model: &ChannelModel,
    ) -> Option<Upsert<CachedChannel, ChannelModel>>;

    /// Remove a channel and its cached messages
    fn remove_channel(&self, channel_id: Snowflake) -> Option<CachedChannel>;

    // ========================================================================
    // Roles
    // ========================================================================

    fn role(&self, guild_id: Snowflake, role_id: Snowflake) -> Option<CachedRole>;

    fn guild_roles(&self, guild_id: Snowflake) -> Vec<CachedRole>;

    fn upsert_role(&self, guild_id: Snowflake, model: &RoleModel) -> Upsert<CachedRole, RoleModel>;

    fn remove_role(&self, guild_id: Snowflake, role_id: Snowflake) -> Option<CachedRole>;

    // ========================================================================
    // Members
    // ========================================================================

    fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<CachedMember>;

    fn guild_members(&self, guild_id: Snowflake) -> Vec<CachedMember>;

    /// `None` when the payload carries no user
    fn upsert_member(
        &self,
        guild_id: Snowflake,
        model: &MemberModel,
    ) -> Option<Upsert<CachedMember, MemberModel>>;

    fn remove_member(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<CachedMember>;

    // ========================================================================
    // Messages
    // ========================================================================

    fn message(&self, channel_id: Snowflake, message_id: Snowflake) -> Option<CachedMessage>;

    /// Cached messages of a channel, oldest first
    fn channel_messages(&self, channel_id: Snowflake) -> Vec<CachedMessage>;

    fn upsert_message(&self, model: &MessageModel) -> Upsert<CachedMessage, MessageModel>;

    /// Patch a cached message; `None` when it is not cached
    fn update_message(
        &self,
        update: &PartialMessageModel,
    ) -> Option<Upsert<CachedMessage, MessageModel>>;

    fn remove_message(&self, channel_id: Snowflake, message_id: Snowflake)
        -> Option<CachedMessage>;

    // ========================================================================
    // Maintenance
    // ========================================================================

    fn stats(&self) -> CacheStats;

    /// Drop everything, e.g. after a session is invalidated
    fn clear(&self);
}
