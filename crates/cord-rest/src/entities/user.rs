//! REST user

use cord_common::ClientResult;
use cord_core::models::UserModel;
use cord_core::{Entity, LocalMessage, Snowflake, TransientUser, User};

use super::{RestMessage, RestPrivateChannel};
use crate::client::RestClient;

#[derive(Debug, Clone)]
pub struct RestUser {
    client: RestClient,
    user: TransientUser,
}

impl RestUser {
    pub fn new(client: RestClient, model: UserModel) -> Self {
        Self {
            client,
            user: TransientUser::new(model),
        }
    }

    pub fn client(&self) -> &RestClient {
        &self.client
    }

    pub fn model(&self) -> &UserModel {
        self.user.model()
    }

    /// Open the DM channel with this user
    pub async fn create_direct_channel(&self) -> ClientResult<RestPrivateChannel> {
        self.client.create_direct_channel(self.id()).await
    }

    /// Send a message to this user's DMs
    pub async fn send_direct_message(&self, message: &LocalMessage) -> ClientResult<RestMessage> {
        let channel = self.create_direct_channel().await?;
        channel.send_message(message).await
    }
}

impl Entity for RestUser {
    fn id(&self) -> Snowflake {
        self.user.id()
    }
}

impl User for RestUser {
    fn name(&self) -> String {
        self.user.name()
    }

    fn discriminator(&self) -> String {
        self.user.discriminator()
    }

    fn global_name(&self) -> Option<String> {
        self.user.global_name()
    }

    fn avatar_hash(&self) -> Option<String> {
        self.user.avatar_hash()
    }

    fn is_bot(&self) -> bool {
        self.user.is_bot()
    }
}
