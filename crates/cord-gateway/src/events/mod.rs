//! Dispatch events
//!
//! Raw dispatch payloads as the gateway sends them, and the
//! [`GatewayEvent`] enum published after the cache has been updated.

mod event;
mod event_types;
mod payloads;

pub use event::GatewayEvent;
pub use event_types::GatewayEventType;
pub use payloads::{
    GuildMemberAddPayload, GuildMemberRemovePayload, GuildMembersChunkPayload,
    GuildRoleDeletePayload, GuildRolePayload, MessageDeleteBulkPayload, MessageDeletePayload,
    ReactionPayload, ReadyPayload, TypingStartPayload,
};
