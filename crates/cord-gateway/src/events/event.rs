//! Events published after the cache has been updated

use cord_cache::{
    CachedChannel, CachedGuild, CachedMember, CachedMessage, CachedRole, CachedUser, RemovedGuild,
};
use cord_core::models::{
    ChannelModel, GuildModel, InteractionModel, MemberModel, MessageModel, PartialMessageModel,
    RoleModel, UserModel,
};
use cord_core::Snowflake;
use serde_json::Value;

use super::{ReactionPayload, TypingStartPayload};

/// Dispatch event with its cache effect applied
///
/// Entity fields are live cache handles; `old` fields are the state the
/// cache held before the event, `None` when nothing was cached.
#[derive(Debug, Clone)]
pub enum GatewayEvent {
    // === Connection ===
    Ready {
        session_id: String,
        user: CachedUser,
        /// Guilds that will arrive later as `GuildAvailable`
        unavailable_guilds: Vec<Snowflake>,
    },
    Resumed,

    // === Guilds ===
    /// A guild from `READY` finished streaming in, or recovered from an outage
    GuildAvailable {
        guild: CachedGuild,
    },
    /// The bot joined a new guild
    GuildJoined {
        guild: CachedGuild,
    },
    GuildUpdated {
        old: Option<GuildModel>,
        guild: CachedGuild,
    },
    /// Outage; the cached guild is kept
    GuildUnavailable {
        guild_id: Snowflake,
    },
    /// The bot left or was removed; everything cached for the guild is gone
    GuildLeft {
        guild_id: Snowflake,
        removed: RemovedGuild,
    },

    // === Roles ===
    RoleCreated {
        role: CachedRole,
    },
    RoleUpdated {
        old: Option<RoleModel>,
        role: CachedRole,
    },
    RoleDeleted {
        guild_id: Snowflake,
        role_id: Snowflake,
        role: Option<CachedRole>,
    },

    // === Channels ===
    ChannelCreated {
        channel: CachedChannel,
    },
    ChannelUpdated {
        old: Option<ChannelModel>,
        channel: CachedChannel,
    },
    ChannelDeleted {
        channel_id: Snowflake,
        channel: Option<CachedChannel>,
    },

    // === Members ===
    MemberJoined {
        member: CachedMember,
    },
    MemberUpdated {
        old: Option<MemberModel>,
        member: CachedMember,
    },
    MemberLeft {
        guild_id: Snowflake,
        user: UserModel,
        member: Option<CachedMember>,
    },
    MembersChunk {
        guild_id: Snowflake,
        members: Vec<CachedMember>,
        chunk_index: u32,
        chunk_count: u32,
        nonce: Option<String>,
    },

    // === Messages ===
    MessageReceived {
        message: CachedMessage,
    },
    /// `message` is `None` when the edited message was not cached
    MessageUpdated {
        old: Option<MessageModel>,
        update: PartialMessageModel,
        message: Option<CachedMessage>,
    },
    MessageDeleted {
        channel_id: Snowflake,
        message_id: Snowflake,
        message: Option<CachedMessage>,
    },
    MessagesBulkDeleted {
        channel_id: Snowflake,
        message_ids: Vec<Snowflake>,
        messages: Vec<CachedMessage>,
    },
    ReactionAdded(ReactionPayload),
    ReactionRemoved(ReactionPayload),

    // === Other ===
    TypingStarted(TypingStartPayload),
    CurrentUserUpdated {
        old: Option<UserModel>,
        user: CachedUser,
    },
    InteractionReceived(Box<InteractionModel>),

    /// Dispatch this crate does not model
    Unhandled {
        name: String,
        data: Value,
    },

    /// The shard lost its connection
    Disconnected {
        shard_id: u32,
        code: Option<u16>,
        will_reconnect: bool,
    },
}

impl GatewayEvent {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ready { .. } => "Ready",
            Self::Resumed => "Resumed",
            Self::GuildAvailable { .. } => "GuildAvailable",
            Self::GuildJoined { .. } => "GuildJoined",
            Self::GuildUpdated { .. } => "GuildUpdated",
            Self::GuildUnavailable { .. } => "GuildUnavailable",
            Self::GuildLeft { .. } => "GuildLeft",
            Self::RoleCreated { .. } => "RoleCreated",
            Self::RoleUpdated { .. } => "RoleUpdated",
            Self::RoleDeleted { .. } => "RoleDeleted",
            Self::ChannelCreated { .. } => "ChannelCreated",
            Self::ChannelUpdated { .. } => "ChannelUpdated",
            Self::ChannelDeleted { .. } => "ChannelDeleted",
            Self::MemberJoined { .. } => "MemberJoined",
            Self::MemberUpdated { .. } => "MemberUpdated",
            Self::MemberLeft { .. } => "MemberLeft",
            Self::MembersChunk { .. } => "MembersChunk",
            Self::MessageReceived { .. } => "MessageReceived",
            Self::MessageUpdated { .. } => "MessageUpdated",
            Self::MessageDeleted { .. } => "MessageDeleted",
            Self::MessagesBulkDeleted { .. } => "MessagesBulkDeleted",
            Self::ReactionAdded(_) => "ReactionAdded",
            Self::ReactionRemoved(_) => "ReactionRemoved",
            Self::TypingStarted(_) => "TypingStarted",
            Self::CurrentUserUpdated { .. } => "CurrentUserUpdated",
            Self::InteractionReceived(_) => "InteractionReceived",
            Self::Unhandled { .. } => "Unhandled",
            Self::Disconnected { .. } => "Disconnected",
        }
    }
}
