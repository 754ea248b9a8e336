//! REST member

use chrono::{DateTime, Utc};
use cord_common::ClientResult;
use cord_core::models::{MemberModel, UserModel};
use cord_core::{Entity, Member, Snowflake, User};

use crate::api::RestRequestOptions;
use crate::client::RestClient;

#[derive(Debug, Clone)]
pub struct RestMember {
    client: RestClient,
    guild_id: Snowflake,
    user: UserModel,
    model: MemberModel,
}

impl RestMember {
    /// `None` when the payload carries no user
    pub fn from_model(client: RestClient, guild_id: Snowflake, model: MemberModel) -> Option<Self> {
        let user = model.user.value()?.clone();
        Some(Self {
            client,
            guild_id,
            user,
            model,
        })
    }

    pub fn model(&self) -> &MemberModel {
        &self.model
    }

    pub fn user(&self) -> &UserModel {
        &self.user
    }

    pub async fn kick(&self, options: Option<&RestRequestOptions>) -> ClientResult<()> {
        self.client
            .kick_member(self.guild_id, self.user.id, options)
            .await
    }

    pub async fn ban(
        &self,
        delete_message_seconds: Option<u32>,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<()> {
        self.client
            .create_ban(self.guild_id, self.user.id, delete_message_seconds, options)
            .await
    }

    pub async fn grant_role(
        &self,
        role_id: Snowflake,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<()> {
        self.client
            .grant_role(self.guild_id, self.user.id, role_id, options)
            .await
    }

    pub async fn revoke_role(
        &self,
        role_id: Snowflake,
        options: Option<&RestRequestOptions>,
    ) -> ClientResult<()> {
        self.client
            .revoke_role(self.guild_id, self.user.id, role_id, options)
            .await
    }
}

impl Entity for RestMember {
    fn id(&self) -> Snowflake {
        self.user.id
    }
}

impl User for RestMember {
    fn name(&self) -> String {
        self.user.username.clone()
    }

    fn discriminator(&self) -> String {
        self.user.discriminator().to_string()
    }

    fn global_name(&self) -> Option<String> {
        self.user.global_name.as_deref_value().cloned()
    }

    fn avatar_hash(&self) -> Option<String> {
        self.user.avatar.as_deref_value().cloned()
    }

    fn is_bot(&self) -> bool {
        self.user.bot.get_or(false)
    }

    /// Nickname, then global name, then username
    fn display_name(&self) -> String {
        self.nick()
            .or_else(|| self.global_name())
            .unwrap_or_else(|| self.name())
    }
}

impl Member for RestMember {
    fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    fn nick(&self) -> Option<String> {
        self.model.nick.as_deref_value().cloned()
    }

    fn role_ids(&self) -> Vec<Snowflake> {
        self.model.role_ids().to_vec()
    }

    fn joined_at(&self) -> Option<DateTime<Utc>> {
        self.model.joined_at.flatten()
    }
}
