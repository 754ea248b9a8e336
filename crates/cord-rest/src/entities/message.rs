//! REST message

use chrono::{DateTime, Utc};
use cord_common::ClientResult;
use cord_core::models::MessageModel;
use cord_core::{Embed, Entity, LocalMessage, Message, Optional, Snowflake, TransientMessage, TransientUser};

use crate::api::{ModifyMessageContent, RestRequestOptions};
use crate::client::RestClient;
use crate::pagination::{PagedEnumerator, ReactionPageFetcher};

#[derive(Debug, Clone)]
pub struct RestMessage {
    client: RestClient,
    message: TransientMessage,
}

impl RestMessage {
    pub fn new(client: RestClient, model: MessageModel) -> Self {
        Self {
            client,
            message: TransientMessage::new(model),
        }
    }

    pub fn model(&self) -> &MessageModel {
        self.message.model()
    }

    pub fn author(&self) -> TransientUser {
        self.message.author()
    }

    pub fn embeds(&self) -> Vec<Embed> {
        self.message.embeds()
    }

    /// Send a message replying to this one
    pub async fn reply(&self, message: LocalMessage) -> ClientResult<RestMessage> {
        let message = message.with_reply_to(self.id());
        self.client
            .send_message(self.channel_id(), &message, None)
            .await
    }

    /// Replace the content and refresh this entity from the response
    pub async fn modify_content(&mut self, content: impl Into<String>) -> ClientResult<()> {
        let content = ModifyMessageContent {
            content: Optional::Present(Some(content.into())),
            ..Default::default()
        };
        let model = self
            .client
            .modify_message(self.channel_id(), self.id(), &content, None)
            .await?;
        self.message = TransientMessage::new(model);
        Ok(())
    }

    pub async fn delete(&self, options: Option<&RestRequestOptions>) -> ClientResult<()> {
        self.client
            .delete_message(self.channel_id(), self.id(), options)
            .await
    }

    pub async fn add_reaction(&self, emoji: &str) -> ClientResult<()> {
        self.client
            .add_reaction(self.channel_id(), self.id(), emoji)
            .await
    }

    pub async fn remove_own_reaction(&self, emoji: &str) -> ClientResult<()> {
        self.client
            .remove_own_reaction(self.channel_id(), self.id(), emoji)
            .await
    }

    pub fn enumerate_reactions(
        &self,
        emoji: impl Into<String>,
        limit: usize,
        start_after: Option<Snowflake>,
    ) -> ClientResult<PagedEnumerator<ReactionPageFetcher>> {
        self.client
            .enumerate_reactions(self.channel_id(), self.id(), emoji, limit, start_after)
    }
}

impl Entity for RestMessage {
    fn id(&self) -> Snowflake {
        self.message.id()
    }
}

impl Message for RestMessage {
    fn channel_id(&self) -> Snowflake {
        self.message.channel_id()
    }

    fn guild_id(&self) -> Option<Snowflake> {
        self.message.guild_id()
    }

    fn author_id(&self) -> Snowflake {
        self.message.author_id()
    }

    fn content(&self) -> String {
        self.message.content()
    }

    fn is_pinned(&self) -> bool {
        self.message.is_pinned()
    }

    fn edited_at(&self) -> Option<DateTime<Utc>> {
        self.message.edited_at()
    }
}
