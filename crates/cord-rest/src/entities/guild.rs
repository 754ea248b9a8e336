//! REST guild

use cord_common::ClientResult;
use cord_core::models::{AuditLogActionType, GuildModel};
use cord_core::{Entity, Guild, Snowflake, TransientRole, TransientVoiceRegion};

use super::{RestChannel, RestGuildChannel, RestMember};
use crate::api::{
    CreateCategoryChannelActionProperties, CreateTextChannelActionProperties,
    CreateVoiceChannelActionProperties, RestRequestOptions,
};
use crate::client::RestClient;
use crate::pagination::{
    AuditLogPageFetcher, BanPageFetcher, MemberPageFetcher, PagedEnumerator, RetrievalDirection,
};

#[derive(Debug, Clone)]
pub struct RestGuild {
    client: RestClient,
    model: GuildModel,
}

impl RestGuild {
    pub fn new(client: RestClient, model: GuildModel) -> Self {
        Self { client, model }
    }

    pub fn model(&self) -> &GuildModel {
        &self.model
    }

    pub fn roles(&self) -> Vec<TransientRole> {
        self.model
            .roles
            .iter()
            .cloned()
            .map(|role| TransientRole::new(self.model.id, role))
            .collect()
    }

    pub async fn fetch_channels(&self) -> ClientResult<Vec<RestChannel>> {
        self.client.fetch_guild_channels(self.model.id).await
    }

    pub async fn create_text_channel(
        &self,
        name: impl Into<String>,
        properties: CreateTextChannelActionProperties,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<RestGuildChannel> {
        self.client
            .create_text_channel(self.model.id, name, properties, options)
            .await
    }

    pub async fn create_voice_channel(
        &self,
        name: impl Into<String>,
        properties: CreateVoiceChannelActionProperties,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<RestGuildChannel> {
        self.client
            .create_voice_channel(self.model.id, name, properties, options)
            .await
    }

    pub async fn create_category_channel(
        &self,
        name: impl Into<String>,
        properties: CreateCategoryChannelActionProperties,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<RestGuildChannel> {
        self.client
            .create_category_channel(self.model.id, name, properties, options)
            .await
    }

    pub async fn fetch_member(&self, user_id: Snowflake) -> ClientResult<RestMember> {
        self.client.fetch_member(self.model.id, user_id).await
    }

    pub fn enumerate_members(
        &self,
        limit: usize,
        start_after: Option<Snowflake>,
    ) -> ClientResult<PagedEnumerator<MemberPageFetcher>> {
        self.client
            .enumerate_members(self.model.id, limit, start_after)
    }

    pub fn enumerate_bans(
        &self,
        limit: usize,
        direction: RetrievalDirection,
        start_from: Option<Snowflake>,
    ) -> ClientResult<PagedEnumerator<BanPageFetcher>> {
        self.client
            .enumerate_bans(self.model.id, limit, direction, start_from)
    }

    pub fn enumerate_audit_logs(
        &self,
        limit: usize,
        user_id: Option<Snowflake>,
        action_type: Option<AuditLogActionType>,
        start_from: Option<Snowflake>,
    ) -> ClientResult<PagedEnumerator<AuditLogPageFetcher>> {
        self.client
            .enumerate_audit_logs(self.model.id, limit, user_id, action_type, start_from)
    }

    pub async fn ban(
        &self,
        user_id: Snowflake,
        delete_message_seconds: Option<u32>,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<()> {
        self.client
            .create_ban(self.model.id, user_id, delete_message_seconds, options)
            .await
    }

    pub async fn unban(&self, user_id: Snowflake, options: Option<&RestRequestOptions>) -> ClientResult<()> {
        self.client.delete_ban(self.model.id, user_id, options).await
    }

    pub async fn fetch_voice_regions(&self) -> ClientResult<Vec<TransientVoiceRegion>> {
        self.client.fetch_guild_voice_regions(self.model.id).await
    }

    pub async fn leave(&self) -> ClientResult<()> {
        self.client.leave_guild(self.model.id).await
    }
}

impl Entity for RestGuild {
    fn id(&self) -> Snowflake {
        self.model.id
    }
}

impl Guild for RestGuild {
    fn name(&self) -> String {
        self.model.name.clone()
    }

    fn owner_id(&self) -> Option<Snowflake> {
        self.model.owner_id.value().copied()
    }

    fn icon_hash(&self) -> Option<String> {
        self.model.icon.as_deref_value().cloned()
    }

    fn is_unavailable(&self) -> bool {
        self.model.unavailable.get_or(false)
    }
}
