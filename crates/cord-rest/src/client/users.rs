//! User endpoints

use cord_common::ClientResult;
use cord_core::models::{ChannelModel, GatewayBotModel, GuildModel, UserModel};
use cord_core::Snowflake;

use super::{page_query, RestClient};
use crate::api::{routes, CreateDirectChannelContent};
use crate::entities::{RestGuild, RestPrivateChannel, RestUser};
use crate::pagination::{GuildPageFetcher, PagedEnumerator, RetrievalDirection};

impl RestClient {
    /// Get the bot's own user
    ///
    /// GET /users/@me
    pub async fn fetch_current_user(&self) -> ClientResult<RestUser> {
        let model: UserModel = self
            .execute(routes::GET_CURRENT_USER.format(&[]), None)
            .await?;
        Ok(RestUser::new(self.clone(), model))
    }

    /// Get user by ID
    ///
    /// GET /users/{user_id}
    pub async fn fetch_user(&self, user_id: Snowflake) -> ClientResult<RestUser> {
        let model: UserModel = self
            .execute(routes::GET_USER.format(&[&user_id]), None)
            .await?;
        Ok(RestUser::new(self.clone(), model))
    }

    /// Open (or reuse) a DM channel with a user
    ///
    /// POST /users/@me/channels
    pub async fn create_direct_channel(&self, user_id: Snowflake) -> ClientResult<RestPrivateChannel> {
        let content = CreateDirectChannelContent {
            recipient_id: user_id,
        };
        let model: ChannelModel = self
            .execute_with(routes::CREATE_DM_CHANNEL.format(&[]), &content, None)
            .await?;
        Ok(RestPrivateChannel::new(self.clone(), model))
    }

    /// One page of the bot's guilds
    ///
    /// GET /users/@me/guilds
    pub async fn fetch_guilds_page(
        &self,
        limit: usize,
        direction: RetrievalDirection,
        anchor: Option<Snowflake>,
    ) -> ClientResult<Vec<RestGuild>> {
        let route = page_query(
            routes::GET_CURRENT_USER_GUILDS.format(&[]),
            limit,
            direction,
            anchor,
        );
        let models: Vec<GuildModel> = self.execute(route, None).await?;
        Ok(models
            .into_iter()
            .map(|model| RestGuild::new(self.clone(), model))
            .collect())
    }

    /// Enumerate the bot's guilds, up to 200 per page
    pub fn enumerate_guilds(
        &self,
        limit: usize,
        direction: RetrievalDirection,
        start_from: Option<Snowflake>,
    ) -> ClientResult<PagedEnumerator<GuildPageFetcher>> {
        Ok(PagedEnumerator::new(
            GuildPageFetcher::new(self.clone()),
            limit,
            direction,
            start_from,
        )?)
    }

    /// Leave a guild
    ///
    /// DELETE /users/@me/guilds/{guild_id}
    pub async fn leave_guild(&self, guild_id: Snowflake) -> ClientResult<()> {
        self.execute_empty(routes::LEAVE_GUILD.format(&[&guild_id]), None)
            .await
    }

    /// Gateway URL and recommended shard count
    ///
    /// GET /gateway/bot
    pub async fn fetch_gateway_bot(&self) -> ClientResult<GatewayBotModel> {
        self.execute(routes::GET_GATEWAY_BOT.format(&[]), None).await
    }
}
