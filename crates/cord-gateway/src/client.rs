//! Gateway client

use std::sync::Arc;

use cord_cache::{
    CacheProvider, CachedChannel, CachedGuild, CachedMember, CachedMessage, CachedUser,
    MemoryCache, SharedCache,
};
use cord_common::{ClientConfig, ClientResult, Token};
use cord_core::models::GatewayBotModel;
use cord_core::Snowflake;
use cord_rest::{RestClient, RestGuild, RestMessage};
use tokio::sync::broadcast;

use crate::cache_updater::CacheUpdater;
use crate::error::GatewayResult;
use crate::events::GatewayEvent;
use crate::protocol::{PresenceUpdatePayload, RequestGuildMembersPayload};
use crate::shard::{Shard, ShardOptions};

/// Events buffered per subscriber before it starts lagging
const EVENT_BUFFER_SIZE: usize = 256;

/// REST client, cache and shard behind one cheap-to-clone handle
///
/// Cached entities carry no client reference; reach the REST API through
/// [`GatewayClient::rest`] or convert with [`GatewayClient::rest_guild`].
#[derive(Clone)]
pub struct GatewayClient {
    rest: RestClient,
    cache: SharedCache,
    shard: Arc<Shard>,
    events: broadcast::Sender<GatewayEvent>,
}

impl GatewayClient {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let rest = RestClient::new(config)?;
        let token = Token::bot(config.token.as_str())?;
        let cache: SharedCache = Arc::new(MemoryCache::from_config(&config.cache));
        Ok(Self::with_parts(
            rest,
            cache,
            token,
            ShardOptions::from_config(&config.gateway),
        ))
    }

    pub fn with_parts(
        rest: RestClient,
        cache: SharedCache,
        token: Token,
        options: ShardOptions,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER_SIZE);
        let shard = Shard::new(
            options,
            token,
            CacheUpdater::new(Arc::clone(&cache)),
            events.clone(),
        );
        Self {
            rest,
            cache,
            shard: Arc::new(shard),
            events,
        }
    }

    pub fn rest(&self) -> &RestClient {
        &self.rest
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn shard(&self) -> &Arc<Shard> {
        &self.shard
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.events.subscribe()
    }

    // ========================================================================
    // Connection
    // ========================================================================

    /// Run the shard until shutdown or a fatal close
    pub async fn run(&self) -> GatewayResult<()> {
        self.shard.run().await
    }

    pub fn shutdown(&self) {
        self.shard.shutdown();
    }

    /// Recommended gateway URL and shard count from the REST API
    pub async fn discover_gateway(&self) -> GatewayResult<GatewayBotModel> {
        let gateway = self.rest.fetch_gateway_bot().await?;
        tracing::debug!(
            url = %gateway.url,
            shards = gateway.shards,
            remaining_sessions = gateway.session_start_limit.remaining,
            "Discovered gateway"
        );
        Ok(gateway)
    }

    pub async fn update_presence(&self, presence: &PresenceUpdatePayload) -> GatewayResult<()> {
        self.shard.update_presence(presence).await
    }

    pub async fn request_guild_members(
        &self,
        request: &RequestGuildMembersPayload,
    ) -> GatewayResult<()> {
        self.shard.request_guild_members(request).await
    }

    // ========================================================================
    // Cache lookups
    // ========================================================================

    pub fn current_user(&self) -> Option<CachedUser> {
        self.cache.current_user()
    }

    pub fn guild(&self, guild_id: Snowflake) -> Option<CachedGuild> {
        self.cache.guild(guild_id)
    }

    pub fn channel(&self, channel_id: Snowflake) -> Option<CachedChannel> {
        self.cache.channel(channel_id)
    }

    pub fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<CachedMember> {
        self.cache.member(guild_id, user_id)
    }

    pub fn message(&self, channel_id: Snowflake, message_id: Snowflake) -> Option<CachedMessage> {
        self.cache.message(channel_id, message_id)
    }

    // ========================================================================
    // Cached to REST
    // ========================================================================

    /// REST view of a cached guild, for calling endpoints on it
    pub fn rest_guild(&self, guild: &CachedGuild) -> RestGuild {
        RestGuild::new(self.rest.clone(), guild.snapshot())
    }

    pub fn rest_message(&self, message: &CachedMessage) -> RestMessage {
        RestMessage::new(self.rest.clone(), message.snapshot())
    }
}

impl std::fmt::Debug for GatewayClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayClient")
            .field("shard", &self.shard)
            .field("cache", &self.cache.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use cord_core::{Entity, Guild};
    use serde_json::json;

    use super::*;

    fn client() -> GatewayClient {
        GatewayClient::new(&ClientConfig::new("secret")).unwrap()
    }

    #[tokio::test]
    async fn test_events_reach_subscribers_and_cache() {
        let client = client();
        let mut events = client.subscribe();

        let updater = CacheUpdater::new(Arc::clone(client.cache()));
        let event = updater
            .apply("GUILD_CREATE", json!({"id": "10", "name": "Rustaceans"}))
            .unwrap();
        client.events.send(event).unwrap();

        assert!(matches!(
            events.recv().await.unwrap(),
            GatewayEvent::GuildJoined { .. }
        ));
        let guild = client.guild(Snowflake::new(10)).unwrap();
        let rest = client.rest_guild(&guild);
        assert_eq!(rest.id(), guild.id());
        assert_eq!(rest.name(), "Rustaceans");
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(GatewayClient::new(&ClientConfig::new("")).is_err());
    }
}
