//! Page fetchers for the paged endpoints

use async_trait::async_trait;
use cord_common::ClientResult;
use cord_core::models::AuditLogActionType;
use cord_core::{AuditLog, Ban, Entity, Snowflake, TransientAuditLog, TransientBan};

use super::{PageFetcher, RetrievalDirection};
use crate::client::RestClient;
use crate::entities::{RestGuild, RestMember, RestMessage, RestUser};

pub const MESSAGES_PAGE_CAP: usize = 100;
pub const AUDIT_LOGS_PAGE_CAP: usize = 100;
pub const BANS_PAGE_CAP: usize = 1000;
pub const MEMBERS_PAGE_CAP: usize = 1000;
pub const GUILDS_PAGE_CAP: usize = 200;
pub const REACTIONS_PAGE_CAP: usize = 100;

// ============================================================================
// Messages
// ============================================================================

#[derive(Debug, Clone)]
pub struct MessagePageFetcher {
    client: RestClient,
    channel_id: Snowflake,
}

impl MessagePageFetcher {
    pub fn new(client: RestClient, channel_id: Snowflake) -> Self {
        Self { client, channel_id }
    }
}

#[async_trait]
impl PageFetcher for MessagePageFetcher {
    type Item = RestMessage;

    fn page_cap(&self) -> usize {
        MESSAGES_PAGE_CAP
    }

    fn item_id(item: &RestMessage) -> Snowflake {
        item.id()
    }

    async fn fetch_page(
        &self,
        limit: usize,
        direction: RetrievalDirection,
        anchor: Option<Snowflake>,
    ) -> ClientResult<Vec<RestMessage>> {
        self.client
            .fetch_messages_page(self.channel_id, limit, direction, anchor)
            .await
    }
}

// ============================================================================
// Audit logs
// ============================================================================

#[derive(Debug, Clone)]
pub struct AuditLogPageFetcher {
    client: RestClient,
    guild_id: Snowflake,
    user_id: Option<Snowflake>,
    action_type: Option<AuditLogActionType>,
}

impl AuditLogPageFetcher {
    pub fn new(client: RestClient, guild_id: Snowflake) -> Self {
        Self {
            client,
            guild_id,
            user_id: None,
            action_type: None,
        }
    }

    /// Only entries made by this user
    pub fn with_user_id(mut self, user_id: Option<Snowflake>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Only entries of this action
    pub fn with_action_type(mut self, action_type: Option<AuditLogActionType>) -> Self {
        self.action_type = action_type;
        self
    }
}

#[async_trait]
impl PageFetcher for AuditLogPageFetcher {
    type Item = TransientAuditLog;

    fn page_cap(&self) -> usize {
        AUDIT_LOGS_PAGE_CAP
    }

    fn supports(&self, direction: RetrievalDirection) -> bool {
        direction != RetrievalDirection::Around
    }

    fn item_id(item: &TransientAuditLog) -> Snowflake {
        item.id()
    }

    async fn fetch_page(
        &self,
        limit: usize,
        direction: RetrievalDirection,
        anchor: Option<Snowflake>,
    ) -> ClientResult<Vec<TransientAuditLog>> {
        self.client
            .fetch_audit_logs_page(
                self.guild_id,
                limit,
                direction,
                anchor,
                self.user_id,
                self.action_type,
            )
            .await
    }
}

// ============================================================================
// Bans
// ============================================================================

#[derive(Debug, Clone)]
pub struct BanPageFetcher {
    client: RestClient,
    guild_id: Snowflake,
}

impl BanPageFetcher {
    pub fn new(client: RestClient, guild_id: Snowflake) -> Self {
        Self { client, guild_id }
    }
}

#[async_trait]
impl PageFetcher for BanPageFetcher {
    type Item = TransientBan;

    fn page_cap(&self) -> usize {
        BANS_PAGE_CAP
    }

    fn supports(&self, direction: RetrievalDirection) -> bool {
        direction != RetrievalDirection::Around
    }

    fn item_id(item: &TransientBan) -> Snowflake {
        item.user_id()
    }

    async fn fetch_page(
        &self,
        limit: usize,
        direction: RetrievalDirection,
        anchor: Option<Snowflake>,
    ) -> ClientResult<Vec<TransientBan>> {
        self.client
            .fetch_bans_page(self.guild_id, limit, direction, anchor)
            .await
    }
}

// ============================================================================
// Members
// ============================================================================

#[derive(Debug, Clone)]
pub struct MemberPageFetcher {
    client: RestClient,
    guild_id: Snowflake,
}

impl MemberPageFetcher {
    pub fn new(client: RestClient, guild_id: Snowflake) -> Self {
        Self { client, guild_id }
    }
}

#[async_trait]
impl PageFetcher for MemberPageFetcher {
    type Item = RestMember;

    fn page_cap(&self) -> usize {
        MEMBERS_PAGE_CAP
    }

    fn supports(&self, direction: RetrievalDirection) -> bool {
        direction == RetrievalDirection::After
    }

    fn item_id(item: &RestMember) -> Snowflake {
        item.id()
    }

    async fn fetch_page(
        &self,
        limit: usize,
        _direction: RetrievalDirection,
        anchor: Option<Snowflake>,
    ) -> ClientResult<Vec<RestMember>> {
        self.client
            .fetch_members_page(self.guild_id, limit, anchor)
            .await
    }
}

// ============================================================================
// Current user guilds
// ============================================================================

#[derive(Debug, Clone)]
pub struct GuildPageFetcher {
    client: RestClient,
}

impl GuildPageFetcher {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for GuildPageFetcher {
    type Item = RestGuild;

    fn page_cap(&self) -> usize {
        GUILDS_PAGE_CAP
    }

    fn supports(&self, direction: RetrievalDirection) -> bool {
        direction != RetrievalDirection::Around
    }

    fn item_id(item: &RestGuild) -> Snowflake {
        item.id()
    }

    async fn fetch_page(
        &self,
        limit: usize,
        direction: RetrievalDirection,
        anchor: Option<Snowflake>,
    ) -> ClientResult<Vec<RestGuild>> {
        self.client.fetch_guilds_page(limit, direction, anchor).await
    }
}

// ============================================================================
// Reactions
// ============================================================================

#[derive(Debug, Clone)]
pub struct ReactionPageFetcher {
    client: RestClient,
    channel_id: Snowflake,
    message_id: Snowflake,
    emoji: String,
}

impl ReactionPageFetcher {
    pub fn new(
        client: RestClient,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: impl Into<String>,
    ) -> Self {
        Self {
            client,
            channel_id,
            message_id,
            emoji: emoji.into(),
        }
    }
}

#[async_trait]
impl PageFetcher for ReactionPageFetcher {
    type Item = RestUser;

    fn page_cap(&self) -> usize {
        REACTIONS_PAGE_CAP
    }

    fn supports(&self, direction: RetrievalDirection) -> bool {
        direction == RetrievalDirection::After
    }

    fn item_id(item: &RestUser) -> Snowflake {
        item.id()
    }

    async fn fetch_page(
        &self,
        limit: usize,
        _direction: RetrievalDirection,
        anchor: Option<Snowflake>,
    ) -> ClientResult<Vec<RestUser>> {
        self.client
            .fetch_reactions_page(self.channel_id, self.message_id, &self.emoji, limit, anchor)
            .await
    }
}
