//! REST stage instance

use cord_common::ClientResult;
use cord_core::models::{StageInstanceModel, StagePrivacyLevel};
use cord_core::{Entity, Snowflake};

use crate::api::{ModifyStageInstanceContent, RestRequestOptions};
use crate::client::RestClient;

/// A live stage in a stage channel
#[derive(Debug, Clone)]
pub struct RestStageInstance {
    client: RestClient,
    model: StageInstanceModel,
}

impl RestStageInstance {
    pub fn new(client: RestClient, model: StageInstanceModel) -> Self {
        Self { client, model }
    }

    pub fn model(&self) -> &StageInstanceModel {
        &self.model
    }

    pub fn guild_id(&self) -> Snowflake {
        self.model.guild_id
    }

    pub fn channel_id(&self) -> Snowflake {
        self.model.channel_id
    }

    pub fn topic(&self) -> &str {
        &self.model.topic
    }

    pub fn privacy_level(&self) -> StagePrivacyLevel {
        self.model.privacy_level
    }

    /// Apply changes and refresh this entity from the response
    pub async fn modify(
        &mut self,
        content: &ModifyStageInstanceContent,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<()> {
        let updated = self
            .client
            .modify_stage_instance(self.model.channel_id, content, options)
            .await?;
        self.model.update(&updated);
        Ok(())
    }

    pub async fn delete(&self, options: Option<&RestRequestOptions>) -> ClientResult<()> {
        self.client
            .delete_stage_instance(self.model.channel_id, options)
            .await
    }
}

impl Entity for RestStageInstance {
    fn id(&self) -> Snowflake {
        self.model.id
    }
}
