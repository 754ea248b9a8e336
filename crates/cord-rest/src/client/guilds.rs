//! Guild, channel creation, audit log, ban and voice region endpoints

use std::collections::HashMap;

use cord_common::ClientResult;
use cord_core::models::{
    AuditLogActionType, AuditLogModel, BanModel, ChannelModel, GuildModel, VoiceRegionModel,
};
use cord_core::{Optional, Snowflake, TransientAuditLog, TransientBan, TransientVoiceRegion};

use super::{page_query, RestClient};
use crate::api::{
    routes, CreateBanContent, CreateCategoryChannelActionProperties, CreateGuildChannelContent,
    CreateTextChannelActionProperties, CreateVoiceChannelActionProperties, RestRequestOptions,
};
use crate::entities::{RestChannel, RestGuild, RestGuildChannel};
use crate::pagination::{AuditLogPageFetcher, BanPageFetcher, PagedEnumerator, RetrievalDirection};

impl RestClient {
    /// Get guild by ID
    ///
    /// GET /guilds/{guild_id}
    pub async fn fetch_guild(&self, guild_id: Snowflake) -> ClientResult<RestGuild> {
        let model: GuildModel = self
            .execute(routes::GET_GUILD.format(&[&guild_id]), None)
            .await?;
        Ok(RestGuild::new(self.clone(), model))
    }

    /// Get all channels in a guild
    ///
    /// GET /guilds/{guild_id}/channels
    pub async fn fetch_guild_channels(&self, guild_id: Snowflake) -> ClientResult<Vec<RestChannel>> {
        let models: Vec<ChannelModel> = self
            .execute(routes::GET_GUILD_CHANNELS.format(&[&guild_id]), None)
            .await?;
        Ok(models
            .into_iter()
            .map(|model| RestChannel::new(self.clone(), model))
            .collect())
    }

    /// Create a guild channel from prepared content
    ///
    /// POST /guilds/{guild_id}/channels
    pub async fn create_guild_channel(
        &self,
        guild_id: Snowflake,
        content: &CreateGuildChannelContent,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<RestGuildChannel> {
        let model: ChannelModel = self
            .execute_with(routes::CREATE_GUILD_CHANNEL.format(&[&guild_id]), content, options)
            .await?;
        Ok(RestGuildChannel::new(self.clone(), model))
    }

    pub async fn create_text_channel(
        &self,
        guild_id: Snowflake,
        name: impl Into<String>,
        properties: CreateTextChannelActionProperties,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<RestGuildChannel> {
        let content = CreateGuildChannelContent::text(name, properties);
        self.create_guild_channel(guild_id, &content, options).await
    }

    pub async fn create_voice_channel(
        &self,
        guild_id: Snowflake,
        name: impl Into<String>,
        properties: CreateVoiceChannelActionProperties,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<RestGuildChannel> {
        let content = CreateGuildChannelContent::voice(name, properties);
        self.create_guild_channel(guild_id, &content, options).await
    }

    pub async fn create_category_channel(
        &self,
        guild_id: Snowflake,
        name: impl Into<String>,
        properties: CreateCategoryChannelActionProperties,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<RestGuildChannel> {
        let content = CreateGuildChannelContent::category(name, properties);
        self.create_guild_channel(guild_id, &content, options).await
    }

    // ========================================================================
    // Audit logs
    // ========================================================================

    /// One page of audit log entries, each paired with the user who acted
    ///
    /// GET /guilds/{guild_id}/audit-logs
    pub async fn fetch_audit_logs_page(
        &self,
        guild_id: Snowflake,
        limit: usize,
        direction: RetrievalDirection,
        anchor: Option<Snowflake>,
        user_id: Option<Snowflake>,
        action_type: Option<AuditLogActionType>,
    ) -> ClientResult<Vec<TransientAuditLog>> {
        let route = page_query(
            routes::GET_AUDIT_LOGS.format(&[&guild_id]),
            limit,
            direction,
            anchor,
        )
        .with_optional_query("user_id", user_id)
        .with_optional_query("action_type", action_type.map(u16::from));

        let log: AuditLogModel = self.execute(route, None).await?;
        let users: HashMap<Snowflake, _> = log
            .users
            .into_iter()
            .map(|user| (user.id, user))
            .collect();
        Ok(log
            .audit_log_entries
            .into_iter()
            .map(|entry| {
                let actor = entry.user_id.and_then(|id| users.get(&id).cloned());
                TransientAuditLog::new(guild_id, entry, actor)
            })
            .collect())
    }

    /// Enumerate audit log entries from newest to oldest, up to 100 per page
    pub fn enumerate_audit_logs(
        &self,
        guild_id: Snowflake,
        limit: usize,
        user_id: Option<Snowflake>,
        action_type: Option<AuditLogActionType>,
        start_from: Option<Snowflake>,
    ) -> ClientResult<PagedEnumerator<AuditLogPageFetcher>> {
        let fetcher = AuditLogPageFetcher::new(self.clone(), guild_id)
            .with_user_id(user_id)
            .with_action_type(action_type);
        Ok(PagedEnumerator::new(
            fetcher,
            limit,
            RetrievalDirection::Before,
            start_from,
        )?)
    }

    // ========================================================================
    // Bans
    // ========================================================================

    /// One page of a guild's bans, ordered by user id
    ///
    /// GET /guilds/{guild_id}/bans
    pub async fn fetch_bans_page(
        &self,
        guild_id: Snowflake,
        limit: usize,
        direction: RetrievalDirection,
        anchor: Option<Snowflake>,
    ) -> ClientResult<Vec<TransientBan>> {
        let route = page_query(routes::GET_BANS.format(&[&guild_id]), limit, direction, anchor);
        let models: Vec<BanModel> = self.execute(route, None).await?;
        Ok(models
            .into_iter()
            .map(|model| TransientBan::new(guild_id, model))
            .collect())
    }

    /// Enumerate a guild's bans, up to 1000 per page
    pub fn enumerate_bans(
        &self,
        guild_id: Snowflake,
        limit: usize,
        direction: RetrievalDirection,
        start_from: Option<Snowflake>,
    ) -> ClientResult<PagedEnumerator<BanPageFetcher>> {
        Ok(PagedEnumerator::new(
            BanPageFetcher::new(self.clone(), guild_id),
            limit,
            direction,
            start_from,
        )?)
    }

    /// Ban a user, optionally deleting their recent messages
    ///
    /// PUT /guilds/{guild_id}/bans/{user_id}
    pub async fn create_ban(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        delete_message_seconds: Option<u32>,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<()> {
        let content = CreateBanContent {
            delete_message_seconds: Optional::from_option(delete_message_seconds),
        };
        self.execute_with_empty(
            routes::CREATE_BAN.format(&[&guild_id, &user_id]),
            &content,
            options,
        )
        .await
    }

    /// Unban a user
    ///
    /// DELETE /guilds/{guild_id}/bans/{user_id}
    pub async fn delete_ban(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<()> {
        self.execute_empty(routes::DELETE_BAN.format(&[&guild_id, &user_id]), options)
            .await
    }

    // ========================================================================
    // Voice regions
    // ========================================================================

    /// GET /voice/regions
    pub async fn fetch_voice_regions(&self) -> ClientResult<Vec<TransientVoiceRegion>> {
        let models: Vec<VoiceRegionModel> = self
            .execute(routes::GET_VOICE_REGIONS.format(&[]), None)
            .await?;
        Ok(models.into_iter().map(TransientVoiceRegion::new).collect())
    }

    /// Regions available to a guild, including custom ones
    ///
    /// GET /guilds/{guild_id}/regions
    pub async fn fetch_guild_voice_regions(
        &self,
        guild_id: Snowflake,
    ) -> ClientResult<Vec<TransientVoiceRegion>> {
        let models: Vec<VoiceRegionModel> = self
            .execute(routes::GET_GUILD_VOICE_REGIONS.format(&[&guild_id]), None)
            .await?;
        Ok(models.into_iter().map(TransientVoiceRegion::new).collect())
    }
}
