//! Channel and stage instance endpoints

use cord_common::ClientResult;
use cord_core::models::{ChannelModel, StageInstanceModel};
use cord_core::Snowflake;

use super::RestClient;
use crate::api::{routes, ModifyChannelContent, ModifyStageInstanceContent, RestRequestOptions};
use crate::entities::{RestChannel, RestStageInstance};

impl RestClient {
    /// Get channel by ID
    ///
    /// GET /channels/{channel_id}
    pub async fn fetch_channel(&self, channel_id: Snowflake) -> ClientResult<RestChannel> {
        let model: ChannelModel = self
            .execute(routes::GET_CHANNEL.format(&[&channel_id]), None)
            .await?;
        Ok(RestChannel::new(self.clone(), model))
    }

    /// Update channel
    ///
    /// PATCH /channels/{channel_id}
    pub async fn modify_channel(
        &self,
        channel_id: Snowflake,
        content: &ModifyChannelContent,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<ChannelModel> {
        self.execute_with(routes::MODIFY_CHANNEL.format(&[&channel_id]), content, options)
            .await
    }

    /// Delete a guild channel or close a DM
    ///
    /// DELETE /channels/{channel_id}
    pub async fn delete_channel(
        &self,
        channel_id: Snowflake,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<()> {
        self.execute_empty(routes::DELETE_CHANNEL.format(&[&channel_id]), options)
            .await
    }

    /// Get the stage instance of a stage channel
    ///
    /// GET /stage-instances/{channel_id}
    pub async fn fetch_stage_instance(&self, channel_id: Snowflake) -> ClientResult<RestStageInstance> {
        let model: StageInstanceModel = self
            .execute(routes::GET_STAGE_INSTANCE.format(&[&channel_id]), None)
            .await?;
        Ok(RestStageInstance::new(self.clone(), model))
    }

    /// Update a stage instance's topic or privacy level
    ///
    /// PATCH /stage-instances/{channel_id}
    pub async fn modify_stage_instance(
        &self,
        channel_id: Snowflake,
        content: &ModifyStageInstanceContent,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<StageInstanceModel> {
        self.execute_with(
            routes::MODIFY_STAGE_INSTANCE.format(&[&channel_id]),
            content,
            options,
        )
        .await
    }

    /// End a stage
    ///
    /// DELETE /stage-instances/{channel_id}
    pub async fn delete_stage_instance(
        &self,
        channel_id: Snowflake,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<()> {
        self.execute_empty(routes::DELETE_STAGE_INSTANCE.format(&[&channel_id]), options)
            .await
    }
}
