//! Default in-memory store
//!
//! Collections are `DashMap`s of entity handles; a handle clones the
//! `Arc` around its model, so lookups never copy state.

mod messages;

use std::hash::Hash;

use cord_common::CacheConfig;
use cord_core::models::{
    ChannelModel, GuildModel, MemberModel, MessageModel, PartialMessageModel, RoleModel,
    UserModel,
};
use cord_core::{Entity, Optional, Snowflake};
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use parking_lot::RwLock;

pub use messages::MessageRing;

use crate::entities::{
    CachedChannel, CachedGuild, CachedMember, CachedMessage, CachedRole, CachedUser,
};
use crate::provider::{CacheProvider, CacheStats, RemovedGuild, Upsert};

/// Messages kept per channel unless configured otherwise
pub const DEFAULT_MESSAGE_CACHE_SIZE: usize = 100;

/// Insert a new entity or merge into the existing one under the shard lock
fn upsert_entry<K, E, M>(
    map: &DashMap<K, E>,
    key: K,
    create: impl FnOnce() -> E,
    merge: impl FnOnce(&E) -> M,
) -> Upsert<E, M>
where
    K: Eq + Hash,
    E: Clone,
{
    match map.entry(key) {
        Entry::Occupied(entry) => {
            let entity = entry.get().clone();
            let old = merge(&entity);
            Upsert::updated(entity, old)
        }
        Entry::Vacant(entry) => {
            let entity = create();
            entry.insert(entity.clone());
            Upsert::created(entity)
        }
    }
}

/// Keyed, thread-safe cache of gateway state
pub struct MemoryCache {
    current_user: RwLock<Option<CachedUser>>,
    users: DashMap<Snowflake, CachedUser>,
    guilds: DashMap<Snowflake, CachedGuild>,
    unavailable_guilds: DashSet<Snowflake>,
    channels: DashMap<Snowflake, CachedChannel>,
    /// Keyed by (guild id, role id)
    roles: DashMap<(Snowflake, Snowflake), CachedRole>,
    /// Keyed by (guild id, user id)
    members: DashMap<(Snowflake, Snowflake), CachedMember>,
    /// Keyed by channel id
    messages: DashMap<Snowflake, MessageRing>,
    message_capacity: usize,
}

impl MemoryCache {
    /// Create a cache keeping up to `message_capacity` messages per channel
    ///
    /// A capacity of zero disables the message cache.
    pub fn new(message_capacity: usize) -> Self {
        Self {
            current_user: RwLock::new(None),
            users: DashMap::new(),
            guilds: DashMap::new(),
            unavailable_guilds: DashSet::new(),
            channels: DashMap::new(),
            roles: DashMap::new(),
            members: DashMap::new(),
            messages: DashMap::new(),
            message_capacity,
        }
    }

    pub fn from_config(config: &CacheConfig) -> Self {
        Self::new(config.message_cache_size)
    }

    pub fn message_capacity(&self) -> usize {
        self.message_capacity
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        Self::new(DEFAULT_MESSAGE_CACHE_SIZE)
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("stats", &self.stats())
            .field("message_capacity", &self.message_capacity)
            .finish()
    }
}

impl CacheProvider for MemoryCache {
    // ========================================================================
    // Current user
    // ========================================================================

    fn current_user(&self) -> Option<CachedUser> {
        self.current_user.read().clone()
    }

    fn set_current_user(&self, model: &UserModel) -> CachedUser {
        let user = self.upsert_user(model).entity;
        *self.current_user.write() = Some(user.clone());
        user
    }

    // ========================================================================
    // Users
    // ========================================================================

    fn user(&self, user_id: Snowflake) -> Option<CachedUser> {
        self.users.get(&user_id).map(|r| r.clone())
    }

    fn upsert_user(&self, model: &UserModel) -> Upsert<CachedUser, UserModel> {
        upsert_entry(
            &self.users,
            model.id,
            || CachedUser::new(model.clone()),
            |user| user.replace_with(|current| current.update(model)),
        )
    }

    // ========================================================================
    // Guilds
    // ========================================================================

    fn guild(&self, guild_id: Snowflake) -> Option<CachedGuild> {
        self.guilds.get(&guild_id).map(|r| r.clone())
    }

    fn guilds(&self) -> Vec<CachedGuild> {
        self.guilds.iter().map(|r| r.value().clone()).collect()
    }

    fn upsert_guild(&self, model: &GuildModel) -> Upsert<CachedGuild, GuildModel> {
        self.unavailable_guilds.remove(&model.id);
        let result = upsert_entry(
            &self.guilds,
            model.id,
            || CachedGuild::new(model.clone()),
            |guild| guild.replace_with(|current| current.update(model)),
        );
        tracing::debug!(
            guild_id = %model.id,
            created = result.is_created(),
            "Guild cached"
        );
        result
    }

    fn remove_guild(&self, guild_id: Snowflake) -> RemovedGuild {
        let guild = self.guilds.remove(&guild_id).map(|(_, guild)| guild);
        self.unavailable_guilds.remove(&guild_id);

        let mut channels = Vec::new();
        self.channels.retain(|_, channel| {
            if channel.guild_id() == Some(guild_id) {
                channels.push(channel.clone());
                false
            } else {
                true
            }
        });
        for channel in &channels {
            self.messages.remove(&channel.id());
        }

        let mut members = Vec::new();
        self.members.retain(|(member_guild, _), member| {
            if *member_guild == guild_id {
                members.push(member.clone());
                false
            } else {
                true
            }
        });

        let mut roles = Vec::new();
        self.roles.retain(|(role_guild, _), role| {
            if *role_guild == guild_id {
                roles.push(role.clone());
                false
            } else {
                true
            }
        });

        tracing::debug!(
            guild_id = %guild_id,
            channels = channels.len(),
            members = members.len(),
            roles = roles.len(),
            "Guild removed from cache"
        );

        RemovedGuild {
            guild,
            channels,
            members,
            roles,
        }
    }

    fn mark_unavailable(&self, guild_id: Snowflake) {
        self.unavailable_guilds.insert(guild_id);
        if let Some(guild) = self.guilds.get(&guild_id) {
            guild.set_unavailable(true);
        }
        tracing::debug!(guild_id = %guild_id, "Guild marked unavailable");
    }

    fn is_unavailable(&self, guild_id: Snowflake) -> bool {
        self.unavailable_guilds.contains(&guild_id)
    }

    // ========================================================================
    // Channels
    // ========================================================================

    fn channel(&self, channel_id: Snowflake) -> Option<CachedChannel> {
        self.channels.get(&channel_id).map(|r| r.clone())
    }

    fn guild_channels(&self, guild_id: Snowflake) -> Vec<CachedChannel> {
        self.channels
            .iter()
            .filter(|r| r.guild_id() == Some(guild_id))
            .map(|r| r.value().clone())
            .collect()
    }

    fn upsert_channel(
        &self,
        guild_id: Option<Snowflake>,
        model: &ChannelModel,
    ) -> Option<Upsert<CachedChannel, ChannelModel>> {
        let mut model = model.clone();
        if let (Some(guild_id), true) = (guild_id, model.guild_id.is_absent()) {
            if model.kind.is_guild() {
                model.guild_id = Optional::Present(guild_id);
            }
        }

        let created = match self.channels.entry(model.id) {
            Entry::Occupied(entry) => {
                let channel = entry.get().clone();
                let old = channel.replace_with(|current| current.update(&model));
                return Some(Upsert::updated(channel, old));
            }
            Entry::Vacant(entry) => {
                let Some(channel) = CachedChannel::new(model) else {
                    tracing::warn!("Guild channel without a guild id was not cached");
                    return None;
                };
                entry.insert(channel.clone());
                channel
            }
        };
        tracing::trace!(channel_id = %created.id(), "Channel cached");
        Some(Upsert::created(created))
    }

    fn remove_channel(&self, channel_id: Snowflake) -> Option<CachedChannel> {
        self.messages.remove(&channel_id);
        let removed = self.channels.remove(&channel_id).map(|(_, channel)| channel);
        if removed.is_some() {
            tracing::debug!(channel_id = %channel_id, "Channel removed from cache");
        }
        removed
    }

    // ========================================================================
    // Roles
    // ========================================================================

    fn role(&self, guild_id: Snowflake, role_id: Snowflake) -> Option<CachedRole> {
        self.roles.get(&(guild_id, role_id)).map(|r| r.clone())
    }

    fn guild_roles(&self, guild_id: Snowflake) -> Vec<CachedRole> {
        let mut roles: Vec<CachedRole> = self
            .roles
            .iter()
            .filter(|r| r.key().0 == guild_id)
            .map(|r| r.value().clone())
            .collect();
        roles.sort_by_key(|role| (role.read().position, role.id()));
        roles
    }

    fn upsert_role(&self, guild_id: Snowflake, model: &RoleModel) -> Upsert<CachedRole, RoleModel> {
        upsert_entry(
            &self.roles,
            (guild_id, model.id),
            || CachedRole::new(guild_id, model.clone()),
            |role| role.replace_with(|current| current.update(model)),
        )
    }

    fn remove_role(&self, guild_id: Snowflake, role_id: Snowflake) -> Option<CachedRole> {
        self.roles.remove(&(guild_id, role_id)).map(|(_, role)| role)
    }

    // ========================================================================
    // Members
    // ========================================================================

    fn member(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<CachedMember> {
        self.members.get(&(guild_id, user_id)).map(|r| r.clone())
    }

    fn guild_members(&self, guild_id: Snowflake) -> Vec<CachedMember> {
        self.members
            .iter()
            .filter(|r| r.key().0 == guild_id)
            .map(|r| r.value().clone())
            .collect()
    }

    fn upsert_member(
        &self,
        guild_id: Snowflake,
        model: &MemberModel,
    ) -> Option<Upsert<CachedMember, MemberModel>> {
        let user_id = model.user_id()?;
        match self.members.entry((guild_id, user_id)) {
            Entry::Occupied(entry) => {
                let member = entry.get().clone();
                let old = member.replace_with(|current| current.update(model));
                Some(Upsert::updated(member, old))
            }
            Entry::Vacant(entry) => {
                let member = CachedMember::new(guild_id, model.clone())?;
                entry.insert(member.clone());
                Some(Upsert::created(member))
            }
        }
    }

    fn remove_member(&self, guild_id: Snowflake, user_id: Snowflake) -> Option<CachedMember> {
        self.members
            .remove(&(guild_id, user_id))
            .map(|(_, member)| member)
    }

    // ========================================================================
    // Messages
    // ========================================================================

    fn message(&self, channel_id: Snowflake, message_id: Snowflake) -> Option<CachedMessage> {
        self.messages
            .get(&channel_id)
            .and_then(|ring| ring.get(message_id).cloned())
    }

    fn channel_messages(&self, channel_id: Snowflake) -> Vec<CachedMessage> {
        self.messages
            .get(&channel_id)
            .map(|ring| ring.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn upsert_message(&self, model: &MessageModel) -> Upsert<CachedMessage, MessageModel> {
        if self.message_capacity == 0 {
            return Upsert::created(CachedMessage::new(model.clone()));
        }

        let mut ring = self
            .messages
            .entry(model.channel_id)
            .or_insert_with(|| MessageRing::new(self.message_capacity));
        if let Some(existing) = ring.get(model.id).cloned() {
            let old = existing.replace_with(|current| *current = model.clone());
            return Upsert::updated(existing, old);
        }

        let message = CachedMessage::new(model.clone());
        if let Some(evicted) = ring.push(message.clone()) {
            tracing::trace!(
                channel_id = %model.channel_id,
                message_id = %evicted.id(),
                "Message evicted from cache"
            );
        }
        Upsert::created(message)
    }

    fn update_message(
        &self,
        update: &PartialMessageModel,
    ) -> Option<Upsert<CachedMessage, MessageModel>> {
        let message = self.message(update.channel_id, update.id)?;
        let old = message.replace_with(|current| current.update(update));
        Some(Upsert::updated(message, old))
    }

    fn remove_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> Option<CachedMessage> {
        self.messages
            .get_mut(&channel_id)
            .and_then(|mut ring| ring.remove(message_id))
    }

    // ========================================================================
    // Maintenance
    // ========================================================================

    fn stats(&self) -> CacheStats {
        CacheStats {
            guilds: self.guilds.len(),
            unavailable_guilds: self.unavailable_guilds.len(),
            channels: self.channels.len(),
            users: self.users.len(),
            members: self.members.len(),
            roles: self.roles.len(),
            messages: self.messages.iter().map(|ring| ring.len()).sum(),
        }
    }

    fn clear(&self) {
        *self.current_user.write() = None;
        self.users.clear();
        self.guilds.clear();
        self.unavailable_guilds.clear();
        self.channels.clear();
        self.roles.clear();
        self.members.clear();
        self.messages.clear();
        tracing::debug!("Cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use cord_core::models::ChannelType;
    use cord_core::{Channel, Guild, Member, Message, Role, User};
    use serde_json::json;

    use super::*;

    fn guild_payload() -> GuildModel {
        serde_json::from_value(json!({
            "id": "100",
            "name": "Testers",
            "owner_id": "1",
            "roles": [
                {"id": "100", "name": "@everyone", "permissions": "0", "position": 0},
                {"id": "101", "name": "mods", "permissions": "8", "position": 1}
            ],
            "members": [{"user": {"id": "1", "username": "alice"}, "roles": ["101"]}],
            "channels": [{"id": "200", "type": 0, "name": "general"}]
        }))
        .unwrap()
    }

    fn message(id: &str, content: &str) -> MessageModel {
        serde_json::from_value(json!({
            "id": id,
            "channel_id": "200",
            "author": {"id": "1", "username": "alice"},
            "content": content,
            "timestamp": "2024-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    /// Mirror of what the gateway updater does with a `GUILD_CREATE`
    fn populate(cache: &MemoryCache, guild: &GuildModel) {
        cache.upsert_guild(guild);
        for role in &guild.roles {
            cache.upsert_role(guild.id, role);
        }
        for member in guild.members.value().into_iter().flatten() {
            if let Some(user) = member.user.value() {
                cache.upsert_user(user);
            }
            cache.upsert_member(guild.id, member);
        }
        for channel in guild.channels.value().into_iter().flatten() {
            cache.upsert_channel(Some(guild.id), channel);
        }
    }

    #[test]
    fn test_upsert_user_shares_entry() {
        let cache = MemoryCache::default();
        let first = cache.upsert_user(&UserModel::new(Snowflake::new(1), "alice"));
        assert!(first.is_created());

        let second = cache.upsert_user(&UserModel::new(Snowflake::new(1), "alice2"));
        assert_eq!(second.old.unwrap().username, "alice");
        assert!(first.entity.ptr_eq(&second.entity));

        // The handle from before the update sees the new name
        assert_eq!(first.entity.name(), "alice2");
        assert_eq!(cache.stats().users, 1);
    }

    #[test]
    fn test_guild_create_populates_collections() {
        let cache = MemoryCache::default();
        populate(&cache, &guild_payload());

        let guild = cache.guild(Snowflake::new(100)).unwrap();
        assert_eq!(guild.name(), "Testers");
        assert!(guild.read().roles.is_empty());
        assert!(guild.read().members.is_absent());

        let channel = cache.channel(Snowflake::new(200)).unwrap();
        assert_eq!(channel.guild_id(), Some(Snowflake::new(100)));
        assert_eq!(channel.kind(), ChannelType::GuildText);

        let roles = cache.guild_roles(Snowflake::new(100));
        assert_eq!(roles.len(), 2);
        assert!(roles[0].is_everyone());
        assert_eq!(roles[1].name(), "mods");

        let member = cache
            .member(Snowflake::new(100), Snowflake::new(1))
            .unwrap();
        assert_eq!(member.display_name(), "alice");
        assert_eq!(member.role_ids(), vec![Snowflake::new(101)]);
    }

    #[test]
    fn test_repeated_guild_create_does_not_duplicate() {
        let cache = MemoryCache::default();
        populate(&cache, &guild_payload());
        let before = cache.stats();
        populate(&cache, &guild_payload());

        assert_eq!(cache.stats(), before);
        assert_eq!(before.guilds, 1);
        assert_eq!(before.channels, 1);
        assert_eq!(before.members, 1);
        assert_eq!(before.roles, 2);
    }

    #[test]
    fn test_channel_update_returns_old_state() {
        let cache = MemoryCache::default();
        populate(&cache, &guild_payload());
        let handle = cache.channel(Snowflake::new(200)).unwrap();

        let mut update = ChannelModel::new(Snowflake::new(200), ChannelType::GuildText);
        update.name = Optional::Present(Some("renamed".to_string()));
        let result = cache.upsert_channel(None, &update).unwrap();

        assert_eq!(
            result.old.unwrap().name.as_deref_value().map(String::as_str),
            Some("general")
        );
        assert_eq!(handle.name().as_deref(), Some("renamed"));
        // Absent fields keep their value
        assert_eq!(handle.guild_id(), Some(Snowflake::new(100)));
    }

    #[test]
    fn test_guild_channel_requires_guild_id() {
        let cache = MemoryCache::default();
        let channel = ChannelModel::new(Snowflake::new(5), ChannelType::GuildVoice);
        assert!(cache.upsert_channel(None, &channel).is_none());

        let dm = ChannelModel::new(Snowflake::new(6), ChannelType::Dm);
        let dm = cache.upsert_channel(None, &dm).unwrap();
        assert!(dm.entity.as_private().is_some());
        assert_eq!(cache.stats().channels, 1);
    }

    #[test]
    fn test_remove_guild_cascades() {
        let cache = MemoryCache::default();
        populate(&cache, &guild_payload());
        cache.upsert_message(&message("300", "hello"));
        cache.upsert_channel(None, &ChannelModel::new(Snowflake::new(6), ChannelType::Dm));

        let removed = cache.remove_guild(Snowflake::new(100));
        assert!(removed.guild.is_some());
        assert_eq!(removed.channels.len(), 1);
        assert_eq!(removed.members.len(), 1);
        assert_eq!(removed.roles.len(), 2);

        let stats = cache.stats();
        assert_eq!(stats.guilds, 0);
        assert_eq!(stats.channels, 1);
        assert_eq!(stats.members, 0);
        assert_eq!(stats.roles, 0);
        assert_eq!(stats.messages, 0);
        // Users outlive the guild
        assert_eq!(stats.users, 1);
    }

    #[test]
    fn test_unavailable_mark_cleared_by_upsert() {
        let cache = MemoryCache::default();
        cache.mark_unavailable(Snowflake::new(100));
        assert!(cache.is_unavailable(Snowflake::new(100)));
        assert!(cache.guild(Snowflake::new(100)).is_none());

        populate(&cache, &guild_payload());
        assert!(!cache.is_unavailable(Snowflake::new(100)));

        cache.mark_unavailable(Snowflake::new(100));
        assert!(cache.guild(Snowflake::new(100)).unwrap().is_unavailable());
    }

    #[test]
    fn test_member_without_user_is_skipped() {
        let cache = MemoryCache::default();
        let mut member = MemberModel::new(UserModel::new(Snowflake::new(1), "alice"));
        member.user = Optional::Absent;
        assert!(cache.upsert_member(Snowflake::new(100), &member).is_none());
        assert_eq!(cache.stats().members, 0);
    }

    #[test]
    fn test_message_update_and_delete() {
        let cache = MemoryCache::default();
        let created = cache.upsert_message(&message("300", "hello")).entity;

        let update: PartialMessageModel = serde_json::from_value(json!({
            "id": "300",
            "channel_id": "200",
            "content": "edited",
            "edited_timestamp": "2024-01-01T00:05:00Z"
        }))
        .unwrap();
        let result = cache.update_message(&update).unwrap();
        assert_eq!(result.old.unwrap().content, "hello");
        assert_eq!(created.content(), "edited");
        assert!(created.edited_at().is_some());

        let removed = cache
            .remove_message(Snowflake::new(200), Snowflake::new(300))
            .unwrap();
        assert!(removed.ptr_eq(&created));
        assert!(cache
            .message(Snowflake::new(200), Snowflake::new(300))
            .is_none());
    }

    #[test]
    fn test_message_cache_is_bounded() {
        let cache = MemoryCache::new(2);
        for id in ["300", "301", "302"] {
            cache.upsert_message(&message(id, "hi"));
        }
        let ids: Vec<_> = cache
            .channel_messages(Snowflake::new(200))
            .iter()
            .map(Entity::id)
            .collect();
        assert_eq!(ids, vec![Snowflake::new(301), Snowflake::new(302)]);

        let disabled = MemoryCache::new(0);
        disabled.upsert_message(&message("300", "hi"));
        assert_eq!(disabled.stats().messages, 0);
    }

    #[test]
    fn test_current_user_and_clear() {
        let cache = MemoryCache::default();
        let me = cache.set_current_user(&UserModel::new(Snowflake::new(9), "bot"));
        assert!(cache.current_user().unwrap().ptr_eq(&me));
        assert!(cache.user(Snowflake::new(9)).is_some());

        cache.clear();
        assert!(cache.current_user().is_none());
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
