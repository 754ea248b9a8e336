//! REST channels
//!
//! [`RestChannel::new`] picks the entity matching the channel type.

use std::collections::HashMap;

use cord_common::ClientResult;
use cord_core::models::{ChannelModel, ChannelType, OverwriteModel};
use cord_core::{
    Channel, Entity, GroupDmChannel, GuildChannel, LocalMessage, PrivateChannel, Snowflake,
    TransientUser, User,
};

use super::RestMessage;
use crate::api::{ModifyChannelContent, RestRequestOptions};
use crate::client::RestClient;
use crate::pagination::{MessagePageFetcher, PagedEnumerator, RetrievalDirection};

// ============================================================================
// Guild channel
// ============================================================================

#[derive(Debug, Clone)]
pub struct RestGuildChannel {
    client: RestClient,
    model: ChannelModel,
}

impl RestGuildChannel {
    pub fn new(client: RestClient, model: ChannelModel) -> Self {
        Self { client, model }
    }

    pub fn model(&self) -> &ChannelModel {
        &self.model
    }

    pub fn topic(&self) -> Option<String> {
        self.model.topic.as_deref_value().cloned()
    }

    pub fn is_nsfw(&self) -> bool {
        self.model.nsfw.get_or(false)
    }

    /// Seconds between messages per member, 0 when off
    pub fn slowmode(&self) -> u32 {
        self.model.rate_limit_per_user.get_or(0)
    }

    pub async fn send_message(&self, message: &LocalMessage) -> ClientResult<RestMessage> {
        self.client.send_message(self.model.id, message, None).await
    }

    pub fn enumerate_messages(
        &self,
        limit: usize,
        direction: RetrievalDirection,
        start_from: Option<Snowflake>,
    ) -> ClientResult<PagedEnumerator<MessagePageFetcher>> {
        self.client
            .enumerate_messages(self.model.id, limit, direction, start_from)
    }

    /// Apply changes and refresh this entity from the response
    pub async fn modify(
        &mut self,
        content: &ModifyChannelContent,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<()> {
        let updated = self
            .client
            .modify_channel(self.model.id, content, options)
            .await?;
        self.model.update(&updated);
        Ok(())
    }

    pub async fn delete(&self, options: Option<&RestRequestOptions>) -> ClientResult<()> {
        self.client.delete_channel(self.model.id, options).await
    }
}

impl Entity for RestGuildChannel {
    fn id(&self) -> Snowflake {
        self.model.id
    }
}

impl Channel for RestGuildChannel {
    fn kind(&self) -> ChannelType {
        self.model.kind
    }

    fn name(&self) -> Option<String> {
        self.model.name.as_deref_value().cloned()
    }
}

impl GuildChannel for RestGuildChannel {
    fn guild_id(&self) -> Snowflake {
        self.model.guild_id.get_or(Snowflake::default())
    }

    fn position(&self) -> i32 {
        self.model.position.get_or(0)
    }

    fn parent_id(&self) -> Option<Snowflake> {
        self.model.parent_id.flatten()
    }

    fn overwrites(&self) -> Vec<OverwriteModel> {
        self.model
            .permission_overwrites
            .value()
            .cloned()
            .unwrap_or_default()
    }
}

// ============================================================================
// Direct message channel
// ============================================================================

#[derive(Debug, Clone)]
pub struct RestPrivateChannel {
    client: RestClient,
    model: ChannelModel,
}

impl RestPrivateChannel {
    pub fn new(client: RestClient, model: ChannelModel) -> Self {
        Self { client, model }
    }

    pub fn model(&self) -> &ChannelModel {
        &self.model
    }

    /// The other side of the conversation
    pub fn recipient(&self) -> Option<TransientUser> {
        self.model
            .recipients
            .value()
            .and_then(|recipients| recipients.first())
            .cloned()
            .map(TransientUser::new)
    }

    pub async fn send_message(&self, message: &LocalMessage) -> ClientResult<RestMessage> {
        self.client.send_message(self.model.id, message, None).await
    }

    pub fn enumerate_messages(
        &self,
        limit: usize,
        direction: RetrievalDirection,
        start_from: Option<Snowflake>,
    ) -> ClientResult<PagedEnumerator<MessagePageFetcher>> {
        self.client
            .enumerate_messages(self.model.id, limit, direction, start_from)
    }

    /// Close the DM; it reopens on the next message
    pub async fn close(&self) -> ClientResult<()> {
        self.client.delete_channel(self.model.id, None).await
    }
}

impl Entity for RestPrivateChannel {
    fn id(&self) -> Snowflake {
        self.model.id
    }
}

impl Channel for RestPrivateChannel {
    fn kind(&self) -> ChannelType {
        self.model.kind
    }

    fn name(&self) -> Option<String> {
        self.recipient().map(|user| user.name())
    }
}

impl PrivateChannel for RestPrivateChannel {
    fn last_message_id(&self) -> Option<Snowflake> {
        self.model.last_message_id.flatten()
    }
}

// ============================================================================
// Group DM channel
// ============================================================================

#[derive(Debug, Clone)]
pub struct RestGroupDmChannel {
    client: RestClient,
    model: ChannelModel,
    recipients: HashMap<Snowflake, TransientUser>,
}

impl RestGroupDmChannel {
    pub fn new(client: RestClient, model: ChannelModel) -> Self {
        let recipients = model
            .recipients
            .value()
            .map(|recipients| {
                recipients
                    .iter()
                    .map(|user| (user.id, TransientUser::new(user.clone())))
                    .collect()
            })
            .unwrap_or_default();
        Self {
            client,
            model,
            recipients,
        }
    }

    pub fn model(&self) -> &ChannelModel {
        &self.model
    }

    /// Recipients keyed by user id
    pub fn recipients(&self) -> &HashMap<Snowflake, TransientUser> {
        &self.recipients
    }

    /// The owner, if they are among the recipients
    pub fn owner(&self) -> Option<&TransientUser> {
        self.owner_id().and_then(|id| self.recipients.get(&id))
    }

    pub async fn send_message(&self, message: &LocalMessage) -> ClientResult<RestMessage> {
        self.client.send_message(self.model.id, message, None).await
    }

    /// Leave the group
    pub async fn leave(&self, options: Option<&RestRequestOptions>) -> ClientResult<()> {
        self.client.delete_channel(self.model.id, options).await
    }
}

impl Entity for RestGroupDmChannel {
    fn id(&self) -> Snowflake {
        self.model.id
    }
}

impl Channel for RestGroupDmChannel {
    fn kind(&self) -> ChannelType {
        self.model.kind
    }

    /// The group's name, or its recipients' names joined by commas
    fn name(&self) -> Option<String> {
        let name = self
            .model
            .name
            .as_deref_value()
            .filter(|name| !name.trim().is_empty());
        if let Some(name) = name {
            return Some(name.clone());
        }
        let names: Vec<String> = self
            .model
            .recipients
            .value()
            .map(|recipients| {
                recipients
                    .iter()
                    .map(|user| user.display_name().to_string())
                    .collect()
            })
            .unwrap_or_default();
        Some(names.join(", "))
    }
}

impl PrivateChannel for RestGroupDmChannel {
    fn last_message_id(&self) -> Option<Snowflake> {
        self.model.last_message_id.flatten()
    }
}

impl GroupDmChannel for RestGroupDmChannel {
    fn icon_hash(&self) -> Option<String> {
        self.model.icon.as_deref_value().cloned()
    }

    fn owner_id(&self) -> Option<Snowflake> {
        self.model.owner_id.value().copied()
    }

    fn recipient_ids(&self) -> Vec<Snowflake> {
        self.recipients.keys().copied().collect()
    }
}

// ============================================================================
// Any channel
// ============================================================================

/// A channel of any type
#[derive(Debug, Clone)]
pub enum RestChannel {
    Guild(RestGuildChannel),
    Private(RestPrivateChannel),
    GroupDm(RestGroupDmChannel),
}

impl RestChannel {
    pub fn new(client: RestClient, model: ChannelModel) -> Self {
        match model.kind {
            ChannelType::Dm => Self::Private(RestPrivateChannel::new(client, model)),
            ChannelType::GroupDm => Self::GroupDm(RestGroupDmChannel::new(client, model)),
            _ => Self::Guild(RestGuildChannel::new(client, model)),
        }
    }

    pub fn model(&self) -> &ChannelModel {
        match self {
            Self::Guild(channel) => channel.model(),
            Self::Private(channel) => channel.model(),
            Self::GroupDm(channel) => channel.model(),
        }
    }

    pub fn as_guild(&self) -> Option<&RestGuildChannel> {
        match self {
            Self::Guild(channel) => Some(channel),
            _ => None,
        }
    }

    pub fn into_guild(self) -> Option<RestGuildChannel> {
        match self {
            Self::Guild(channel) => Some(channel),
            _ => None,
        }
    }

    pub fn as_group_dm(&self) -> Option<&RestGroupDmChannel> {
        match self {
            Self::GroupDm(channel) => Some(channel),
            _ => None,
        }
    }

    pub async fn send_message(&self, message: &LocalMessage) -> ClientResult<RestMessage> {
        match self {
            Self::Guild(channel) => channel.send_message(message).await,
            Self::Private(channel) => channel.send_message(message).await,
            Self::GroupDm(channel) => channel.send_message(message).await,
        }
    }
}

impl Entity for RestChannel {
    fn id(&self) -> Snowflake {
        self.model().id
    }
}

impl Channel for RestChannel {
    fn kind(&self) -> ChannelType {
        self.model().kind
    }

    fn name(&self) -> Option<String> {
        match self {
            Self::Guild(channel) => channel.name(),
            Self::Private(channel) => channel.name(),
            Self::GroupDm(channel) => channel.name(),
        }
    }
}

#[cfg(test)]
mod tests {
    use cord_core::models::UserModel;
    use cord_core::Optional;

    use super::super::tests::test_client;
    use super::*;

    fn group(name: Optional<Option<String>>) -> ChannelModel {
        let mut model = ChannelModel::new(Snowflake::new(10), ChannelType::GroupDm);
        model.name = name;
        model.owner_id = Optional::Present(Snowflake::new(2));
        model.recipients = Optional::Present(vec![
            UserModel::new(Snowflake::new(1), "alice"),
            UserModel::new(Snowflake::new(2), "bob"),
        ]);
        model
    }

    #[test]
    fn test_group_dm_owner_lookup() {
        let channel = RestGroupDmChannel::new(test_client(), group(Optional::Absent));
        assert_eq!(channel.owner().map(User::name), Some("bob".to_string()));
        assert_eq!(channel.recipients().len(), 2);
        let mut ids = channel.recipient_ids();
        ids.sort();
        assert_eq!(ids, vec![Snowflake::new(1), Snowflake::new(2)]);
    }

    #[test]
    fn test_group_dm_name_falls_back_to_recipients() {
        let unnamed = RestGroupDmChannel::new(test_client(), group(Optional::Absent));
        assert_eq!(unnamed.name().as_deref(), Some("alice, bob"));

        let blank = RestGroupDmChannel::new(test_client(), group(Optional::Present(Some("  ".to_string()))));
        assert_eq!(blank.name().as_deref(), Some("alice, bob"));

        let named = RestGroupDmChannel::new(test_client(), group(Optional::Present(Some("Raid".to_string()))));
        assert_eq!(named.name().as_deref(), Some("Raid"));
    }

    #[test]
    fn test_group_dm_owner_not_recipient() {
        let mut model = group(Optional::Absent);
        model.owner_id = Optional::Present(Snowflake::new(99));
        let channel = RestGroupDmChannel::new(test_client(), model);
        assert!(channel.owner().is_none());
        assert_eq!(channel.owner_id(), Some(Snowflake::new(99)));
    }

    #[test]
    fn test_channel_dispatch_by_type() {
        let client = test_client();
        let dm = RestChannel::new(client.clone(), ChannelModel::new(Snowflake::new(1), ChannelType::Dm));
        assert!(matches!(dm, RestChannel::Private(_)));

        let group = RestChannel::new(client.clone(), group(Optional::Absent));
        assert!(group.as_group_dm().is_some());

        let mut text = ChannelModel::new(Snowflake::new(3), ChannelType::GuildText);
        text.guild_id = Optional::Present(Snowflake::new(7));
        text.name = Optional::Present(Some("general".to_string()));
        let text = RestChannel::new(client, text);
        assert_eq!(text.name().as_deref(), Some("general"));
        assert_eq!(text.as_guild().map(GuildChannel::guild_id), Some(Snowflake::new(7)));
        assert_eq!(text.mention(), "<#3>");
    }
}
