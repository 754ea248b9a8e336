//! Dispatch payloads without a matching model in `cord-core`

use cord_core::models::{
    EmojiModel, MemberModel, RoleModel, UnavailableGuildModel, UserModel,
};
use cord_core::Snowflake;
use serde::{Deserialize, Serialize};

// === Connection Events ===

/// READY payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyPayload {
    /// Gateway protocol version
    pub v: u8,
    pub user: UserModel,
    /// Guilds of this shard; they stream in later as `GUILD_CREATE`
    pub guilds: Vec<UnavailableGuildModel>,
    pub session_id: String,
    /// URL to reconnect to when resuming
    #[serde(default)]
    pub resume_gateway_url: Option<String>,
    #[serde(default)]
    pub shard: Option<[u32; 2]>,
}

// === Role Events ===

/// GUILD_ROLE_CREATE and GUILD_ROLE_UPDATE payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildRolePayload {
    pub guild_id: Snowflake,
    pub role: RoleModel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildRoleDeletePayload {
    pub guild_id: Snowflake,
    pub role_id: Snowflake,
}

// === Member Events ===

/// GUILD_MEMBER_ADD and GUILD_MEMBER_UPDATE payload: a member plus its guild
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMemberAddPayload {
    pub guild_id: Snowflake,
    #[serde(flatten)]
    pub member: MemberModel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMemberRemovePayload {
    pub guild_id: Snowflake,
    pub user: UserModel,
}

/// Response to a Request Guild Members command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuildMembersChunkPayload {
    pub guild_id: Snowflake,
    pub members: Vec<MemberModel>,
    pub chunk_index: u32,
    pub chunk_count: u32,
    /// Requested ids that are not members
    #[serde(default)]
    pub not_found: Vec<Snowflake>,
    #[serde(default)]
    pub nonce: Option<String>,
}

// === Message Events ===

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeletePayload {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDeleteBulkPayload {
    pub ids: Vec<Snowflake>,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
}

/// MESSAGE_REACTION_ADD and MESSAGE_REACTION_REMOVE payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionPayload {
    pub user_id: Snowflake,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub emoji: EmojiModel,
    /// Only sent with MESSAGE_REACTION_ADD in guilds
    #[serde(default)]
    pub member: Option<MemberModel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingStartPayload {
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub user_id: Snowflake,
    /// Unix time in seconds
    pub timestamp: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_add_flattens_member() {
        let payload: GuildMemberAddPayload = serde_json::from_str(
            r#"{"guild_id": "10", "user": {"id": "1", "username": "alice"},
                "nick": "Al", "roles": ["11"], "joined_at": "2024-01-01T00:00:00Z"}"#,
        )
        .unwrap();

        assert_eq!(payload.guild_id, Snowflake::new(10));
        assert_eq!(payload.member.user_id(), Some(Snowflake::new(1)));
        assert_eq!(payload.member.role_ids(), &[Snowflake::new(11)]);
        assert!(payload.member.nick.is_present());
    }

    #[test]
    fn test_ready_payload() {
        let ready: ReadyPayload = serde_json::from_str(
            r#"{"v": 10, "user": {"id": "9", "username": "bot", "bot": true},
                "guilds": [{"id": "10", "unavailable": true}],
                "session_id": "abc", "resume_gateway_url": "wss://resume.example",
                "shard": [0, 1], "application": {"id": "9", "flags": 0}}"#,
        )
        .unwrap();

        assert_eq!(ready.session_id, "abc");
        assert_eq!(ready.guilds.len(), 1);
        assert!(ready.guilds[0].is_outage());
        assert_eq!(ready.shard, Some([0, 1]));
    }
}
