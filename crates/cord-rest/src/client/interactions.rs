//! Application command and interaction followup endpoints

use cord_common::ClientResult;
use cord_core::models::{ApplicationCommandModel, MessageModel};
use cord_core::{LocalInteractionFollowup, LocalSlashCommand, Snowflake};

use super::RestClient;
use crate::api::routes;
use crate::entities::RestMessage;

impl RestClient {
    /// GET /applications/{application_id}/commands
    pub async fn fetch_global_commands(
        &self,
        application_id: Snowflake,
    ) -> ClientResult<Vec<ApplicationCommandModel>> {
        self.execute(routes::GET_GLOBAL_COMMANDS.format(&[&application_id]), None)
            .await
    }

    /// Register (or overwrite by name) a global slash command
    ///
    /// POST /applications/{application_id}/commands
    pub async fn create_global_command(
        &self,
        application_id: Snowflake,
        command: &LocalSlashCommand,
    ) -> ClientResult<ApplicationCommandModel> {
        let content = command.to_model()?;
        self.execute_with(
            routes::CREATE_GLOBAL_COMMAND.format(&[&application_id]),
            &content,
            None,
        )
        .await
    }

    /// Send a followup message for an interaction
    ///
    /// POST /webhooks/{application_id}/{interaction_token}
    pub async fn create_followup(
        &self,
        application_id: Snowflake,
        interaction_token: &str,
        followup: &LocalInteractionFollowup,
    ) -> ClientResult<RestMessage> {
        let content = followup.to_model()?;
        let route = routes::CREATE_FOLLOWUP_MESSAGE
            .format(&[&application_id, &interaction_token])
            .with_query("wait", true);
        let model: MessageModel = self.execute_with(route, &content, None).await?;
        Ok(RestMessage::new(self.clone(), model))
    }
}
