//! Message and reaction endpoints

use cord_common::ClientResult;
use cord_core::models::{MessageModel, UserModel};
use cord_core::{LocalMessage, Snowflake};

use super::{encode_emoji, page_query, RestClient};
use crate::api::{routes, ModifyMessageContent, RestRequestOptions};
use crate::entities::{RestMessage, RestUser};
use crate::pagination::{
    MessagePageFetcher, PagedEnumerator, ReactionPageFetcher, RetrievalDirection,
};

impl RestClient {
    /// One page of a channel's messages, newest first
    ///
    /// GET /channels/{channel_id}/messages
    pub async fn fetch_messages_page(
        &self,
        channel_id: Snowflake,
        limit: usize,
        direction: RetrievalDirection,
        anchor: Option<Snowflake>,
    ) -> ClientResult<Vec<RestMessage>> {
        let route = page_query(
            routes::GET_MESSAGES.format(&[&channel_id]),
            limit,
            direction,
            anchor,
        );
        let models: Vec<MessageModel> = self.execute(route, None).await?;
        Ok(models
            .into_iter()
            .map(|model| RestMessage::new(self.clone(), model))
            .collect())
    }

    /// Enumerate a channel's messages, up to 100 per page
    pub fn enumerate_messages(
        &self,
        channel_id: Snowflake,
        limit: usize,
        direction: RetrievalDirection,
        start_from: Option<Snowflake>,
    ) -> ClientResult<PagedEnumerator<MessagePageFetcher>> {
        Ok(PagedEnumerator::new(
            MessagePageFetcher::new(self.clone(), channel_id),
            limit,
            direction,
            start_from,
        )?)
    }

    /// Get message by ID
    ///
    /// GET /channels/{channel_id}/messages/{message_id}
    pub async fn fetch_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> ClientResult<RestMessage> {
        let model: MessageModel = self
            .execute(routes::GET_MESSAGE.format(&[&channel_id, &message_id]), None)
            .await?;
        Ok(RestMessage::new(self.clone(), model))
    }

    /// Create message
    ///
    /// POST /channels/{channel_id}/messages
    pub async fn send_message(
        &self,
        channel_id: Snowflake,
        message: &LocalMessage,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<RestMessage> {
        let content = message.to_model()?;
        let model: MessageModel = self
            .execute_with(routes::CREATE_MESSAGE.format(&[&channel_id]), &content, options)
            .await?;
        Ok(RestMessage::new(self.clone(), model))
    }

    /// Edit message
    ///
    /// PATCH /channels/{channel_id}/messages/{message_id}
    pub async fn modify_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        content: &ModifyMessageContent,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<MessageModel> {
        self.execute_with(
            routes::MODIFY_MESSAGE.format(&[&channel_id, &message_id]),
            content,
            options,
        )
        .await
    }

    /// Delete message
    ///
    /// DELETE /channels/{channel_id}/messages/{message_id}
    pub async fn delete_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<()> {
        self.execute_empty(
            routes::DELETE_MESSAGE.format(&[&channel_id, &message_id]),
            options,
        )
        .await
    }

    // ========================================================================
    // Reactions
    // ========================================================================

    /// React with a unicode emoji or `name:id`
    ///
    /// PUT /channels/{channel_id}/messages/{message_id}/reactions/{emoji}/@me
    pub async fn add_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> ClientResult<()> {
        let emoji = encode_emoji(emoji);
        self.execute_empty(
            routes::CREATE_REACTION.format(&[&channel_id, &message_id, &emoji]),
            None,
        )
        .await
    }

    /// DELETE /channels/{channel_id}/messages/{message_id}/reactions/{emoji}/@me
    pub async fn remove_own_reaction(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
    ) -> ClientResult<()> {
        let emoji = encode_emoji(emoji);
        self.execute_empty(
            routes::DELETE_OWN_REACTION.format(&[&channel_id, &message_id, &emoji]),
            None,
        )
        .await
    }

    /// One page of users who reacted with an emoji
    ///
    /// GET /channels/{channel_id}/messages/{message_id}/reactions/{emoji}
    pub async fn fetch_reactions_page(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
        limit: usize,
        after: Option<Snowflake>,
    ) -> ClientResult<Vec<RestUser>> {
        let emoji = encode_emoji(emoji);
        let route = page_query(
            routes::GET_REACTIONS.format(&[&channel_id, &message_id, &emoji]),
            limit,
            RetrievalDirection::After,
            after,
        );
        let models: Vec<UserModel> = self.execute(route, None).await?;
        Ok(models
            .into_iter()
            .map(|model| RestUser::new(self.clone(), model))
            .collect())
    }

    /// Enumerate users who reacted with an emoji, up to 100 per page
    pub fn enumerate_reactions(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        emoji: impl Into<String>,
        limit: usize,
        start_after: Option<Snowflake>,
    ) -> ClientResult<PagedEnumerator<ReactionPageFetcher>> {
        Ok(PagedEnumerator::new(
            ReactionPageFetcher::new(self.clone(), channel_id, message_id, emoji),
            limit,
            RetrievalDirection::After,
            start_after,
        )?)
    }
}
