//! Applies dispatch events to the cache

use cord_cache::{CacheProvider, SharedCache};
use cord_core::models::{
    ChannelModel, GuildModel, InteractionModel, MessageModel, PartialMessageModel,
    UnavailableGuildModel, UserModel,
};
use cord_core::Entity;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};
use crate::events::{
    GatewayEvent, GatewayEventType, GuildMemberAddPayload, GuildMemberRemovePayload,
    GuildMembersChunkPayload, GuildRoleDeletePayload, GuildRolePayload, MessageDeleteBulkPayload,
    MessageDeletePayload, ReactionPayload, ReadyPayload, TypingStartPayload,
};

fn decode<T: DeserializeOwned>(data: Value) -> GatewayResult<T> {
    Ok(serde_json::from_value(data)?)
}

/// Turns dispatches into cache writes and [`GatewayEvent`]s
///
/// Creates (`*_CREATE`, `READY`) insert entries, patches (`*_UPDATE`) merge
/// only the fields present in the payload, and removals (`*_DELETE`,
/// `GUILD_MEMBER_REMOVE`) drop entries, cascading for a left guild.
#[derive(Clone)]
pub struct CacheUpdater {
    cache: SharedCache,
}

impl CacheUpdater {
    pub fn new(cache: SharedCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    /// Apply one dispatch
    ///
    /// Names not modelled here come back as [`GatewayEvent::Unhandled`].
    pub fn apply(&self, name: &str, data: Value) -> GatewayResult<GatewayEvent> {
        let Some(kind) = GatewayEventType::from_str(name) else {
            return Ok(GatewayEvent::Unhandled {
                name: name.to_string(),
                data,
            });
        };

        tracing::trace!(event = %kind, "Applying dispatch to cache");

        match kind {
            GatewayEventType::Ready => self.ready(decode(data)?),
            GatewayEventType::Resumed => Ok(GatewayEvent::Resumed),
            GatewayEventType::GuildCreate => Ok(self.guild_create(decode(data)?)),
            GatewayEventType::GuildUpdate => {
                let model: GuildModel = decode(data)?;
                let result = self.cache.upsert_guild(&model);
                Ok(GatewayEvent::GuildUpdated {
                    old: result.old,
                    guild: result.entity,
                })
            }
            GatewayEventType::GuildDelete => Ok(self.guild_delete(decode(data)?)),
            GatewayEventType::GuildRoleCreate | GatewayEventType::GuildRoleUpdate => {
                let payload: GuildRolePayload = decode(data)?;
                let result = self.cache.upsert_role(payload.guild_id, &payload.role);
                Ok(if kind == GatewayEventType::GuildRoleCreate {
                    GatewayEvent::RoleCreated {
                        role: result.entity,
                    }
                } else {
                    GatewayEvent::RoleUpdated {
                        old: result.old,
                        role: result.entity,
                    }
                })
            }
            GatewayEventType::GuildRoleDelete => {
                let payload: GuildRoleDeletePayload = decode(data)?;
                Ok(GatewayEvent::RoleDeleted {
                    guild_id: payload.guild_id,
                    role_id: payload.role_id,
                    role: self.cache.remove_role(payload.guild_id, payload.role_id),
                })
            }
            GatewayEventType::ChannelCreate | GatewayEventType::ThreadCreate => {
                let model: ChannelModel = decode(data)?;
                let result = self.upsert_channel(&model)?;
                Ok(GatewayEvent::ChannelCreated {
                    channel: result.entity,
                })
            }
            GatewayEventType::ChannelUpdate | GatewayEventType::ThreadUpdate => {
                let model: ChannelModel = decode(data)?;
                let result = self.upsert_channel(&model)?;
                Ok(GatewayEvent::ChannelUpdated {
                    old: result.old,
                    channel: result.entity,
                })
            }
            GatewayEventType::ChannelDelete | GatewayEventType::ThreadDelete => {
                let model: ChannelModel = decode(data)?;
                Ok(GatewayEvent::ChannelDeleted {
                    channel_id: model.id,
                    channel: self.cache.remove_channel(model.id),
                })
            }
            GatewayEventType::GuildMemberAdd | GatewayEventType::GuildMemberUpdate => {
                let payload: GuildMemberAddPayload = decode(data)?;
                if let Some(user) = payload.member.user.value() {
                    self.cache.upsert_user(user);
                }
                let result = self
                    .cache
                    .upsert_member(payload.guild_id, &payload.member)
                    .ok_or_else(|| missing_field("user"))?;
                Ok(if kind == GatewayEventType::GuildMemberAdd {
                    GatewayEvent::MemberJoined {
                        member: result.entity,
                    }
                } else {
                    GatewayEvent::MemberUpdated {
                        old: result.old,
                        member: result.entity,
                    }
                })
            }
            GatewayEventType::GuildMemberRemove => {
                let payload: GuildMemberRemovePayload = decode(data)?;
                let member = self.cache.remove_member(payload.guild_id, payload.user.id);
                Ok(GatewayEvent::MemberLeft {
                    guild_id: payload.guild_id,
                    user: payload.user,
                    member,
                })
            }
            GatewayEventType::GuildMembersChunk => {
                let payload: GuildMembersChunkPayload = decode(data)?;
                let members = payload
                    .members
                    .iter()
                    .filter_map(|member| {
                        if let Some(user) = member.user.value() {
                            self.cache.upsert_user(user);
                        }
                        self.cache.upsert_member(payload.guild_id, member)
                    })
                    .map(|result| result.entity)
                    .collect();
                Ok(GatewayEvent::MembersChunk {
                    guild_id: payload.guild_id,
                    members,
                    chunk_index: payload.chunk_index,
                    chunk_count: payload.chunk_count,
                    nonce: payload.nonce,
                })
            }
            GatewayEventType::MessageCreate => {
                let model: MessageModel = decode(data)?;
                self.cache.upsert_user(&model.author);
                Ok(GatewayEvent::MessageReceived {
                    message: self.cache.upsert_message(&model).entity,
                })
            }
            GatewayEventType::MessageUpdate => {
                let update: PartialMessageModel = decode(data)?;
                let (old, message) = match self.cache.update_message(&update) {
                    Some(result) => (result.old, Some(result.entity)),
                    None => (None, None),
                };
                Ok(GatewayEvent::MessageUpdated {
                    old,
                    update,
                    message,
                })
            }
            GatewayEventType::MessageDelete => {
                let payload: MessageDeletePayload = decode(data)?;
                Ok(GatewayEvent::MessageDeleted {
                    channel_id: payload.channel_id,
                    message_id: payload.id,
                    message: self.cache.remove_message(payload.channel_id, payload.id),
                })
            }
            GatewayEventType::MessageDeleteBulk => {
                let payload: MessageDeleteBulkPayload = decode(data)?;
                let messages = payload
                    .ids
                    .iter()
                    .filter_map(|id| self.cache.remove_message(payload.channel_id, *id))
                    .collect();
                Ok(GatewayEvent::MessagesBulkDeleted {
                    channel_id: payload.channel_id,
                    message_ids: payload.ids,
                    messages,
                })
            }
            GatewayEventType::MessageReactionAdd => {
                Ok(GatewayEvent::ReactionAdded(decode::<ReactionPayload>(data)?))
            }
            GatewayEventType::MessageReactionRemove => {
                Ok(GatewayEvent::ReactionRemoved(decode::<ReactionPayload>(data)?))
            }
            GatewayEventType::TypingStart => {
                Ok(GatewayEvent::TypingStarted(decode::<TypingStartPayload>(data)?))
            }
            GatewayEventType::UserUpdate => {
                let model: UserModel = decode(data)?;
                let old = self.cache.current_user().map(|user| user.snapshot());
                let user = self.cache.set_current_user(&model);
                Ok(GatewayEvent::CurrentUserUpdated { old, user })
            }
            GatewayEventType::InteractionCreate => Ok(GatewayEvent::InteractionReceived(
                Box::new(decode::<InteractionModel>(data)?),
            )),
        }
    }

    fn ready(&self, payload: ReadyPayload) -> GatewayResult<GatewayEvent> {
        let user = self.cache.set_current_user(&payload.user);
        let unavailable_guilds = payload
            .guilds
            .iter()
            .map(|guild| {
                self.cache.mark_unavailable(guild.id);
                guild.id
            })
            .collect::<Vec<_>>();

        tracing::info!(
            session_id = %payload.session_id,
            user_id = %user.id(),
            guilds = unavailable_guilds.len(),
            "Session ready"
        );

        Ok(GatewayEvent::Ready {
            session_id: payload.session_id,
            user,
            unavailable_guilds,
        })
    }

    /// Insert a guild with its roles, members, channels and threads
    fn guild_create(&self, model: GuildModel) -> GatewayEvent {
        if model.unavailable.get_or(false) {
            self.cache.mark_unavailable(model.id);
            return GatewayEvent::GuildUnavailable { guild_id: model.id };
        }

        let was_unavailable = self.cache.is_unavailable(model.id);
        let guild = self.cache.upsert_guild(&model).entity;

        for role in &model.roles {
            self.cache.upsert_role(model.id, role);
        }
        for member in model.members.value().into_iter().flatten() {
            if let Some(user) = member.user.value() {
                self.cache.upsert_user(user);
            }
            self.cache.upsert_member(model.id, member);
        }
        let channels = model.channels.value().into_iter().flatten();
        let threads = model.threads.value().into_iter().flatten();
        for channel in channels.chain(threads) {
            self.cache.upsert_channel(Some(model.id), channel);
        }

        if was_unavailable {
            GatewayEvent::GuildAvailable { guild }
        } else {
            GatewayEvent::GuildJoined { guild }
        }
    }

    fn guild_delete(&self, payload: UnavailableGuildModel) -> GatewayEvent {
        if payload.is_outage() {
            self.cache.mark_unavailable(payload.id);
            return GatewayEvent::GuildUnavailable {
                guild_id: payload.id,
            };
        }
        GatewayEvent::GuildLeft {
            guild_id: payload.id,
            removed: self.cache.remove_guild(payload.id),
        }
    }

    fn upsert_channel(
        &self,
        model: &ChannelModel,
    ) -> GatewayResult<cord_cache::Upsert<cord_cache::CachedChannel, ChannelModel>> {
        self.cache
            .upsert_channel(model.guild_id.value().copied(), model)
            .ok_or_else(|| missing_field("guild_id"))
    }
}

fn missing_field(field: &'static str) -> GatewayError {
    GatewayError::Decode(<serde_json::Error as serde::de::Error>::missing_field(field))
}

impl std::fmt::Debug for CacheUpdater {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheUpdater")
            .field("stats", &self.cache.stats())
            .finish()
    }
}
