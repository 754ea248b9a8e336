use cord_core::models::{ChannelModel, ChannelType, OverwriteModel};
use cord_core::{Channel, Entity, GroupDmChannel, GuildChannel, PrivateChannel, Snowflake};

use super::{share, shared_handle, Shared};

/// Channel, thread or category inside a guild
#[derive(Debug, Clone)]
pub struct CachedGuildChannel {
    guild_id: Snowflake,
    id: Snowflake,
    model: Shared<ChannelModel>,
}

impl CachedGuildChannel {
    pub fn topic(&self) -> Option<String> {
        self.model.read().topic.as_deref_value().cloned()
    }

    pub fn is_nsfw(&self) -> bool {
        self.model.read().nsfw.get_or(false)
    }

    /// Slowmode in seconds
    pub fn slowmode(&self) -> u32 {
        self.model.read().rate_limit_per_user.get_or(0)
    }

    pub fn is_thread(&self) -> bool {
        self.model.read().kind.is_thread()
    }
}

shared_handle!(CachedGuildChannel, ChannelModel);

impl Entity for CachedGuildChannel {
    fn id(&self) -> Snowflake {
        self.id
    }
}

impl Channel for CachedGuildChannel {
    fn kind(&self) -> ChannelType {
        self.model.read().kind
    }

    fn name(&self) -> Option<String> {
        self.model.read().name.as_deref_value().cloned()
    }
}

impl GuildChannel for CachedGuildChannel {
    fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    fn position(&self) -> i32 {
        self.model.read().position.get_or(0)
    }

    fn parent_id(&self) -> Option<Snowflake> {
        self.model.read().parent_id.as_deref_value().copied()
    }

    fn overwrites(&self) -> Vec<OverwriteModel> {
        self.model
            .read()
            .permission_overwrites
            .value()
            .cloned()
            .unwrap_or_default()
    }
}

/// DM or group DM
#[derive(Debug, Clone)]
pub struct CachedPrivateChannel {
    id: Snowflake,
    model: Shared<ChannelModel>,
}

impl CachedPrivateChannel {
    pub fn is_group(&self) -> bool {
        self.model.read().kind == ChannelType::GroupDm
    }
}

shared_handle!(CachedPrivateChannel, ChannelModel);

impl Entity for CachedPrivateChannel {
    fn id(&self) -> Snowflake {
        self.id
    }
}

impl Channel for CachedPrivateChannel {
    fn kind(&self) -> ChannelType {
        self.model.read().kind
    }

    /// Explicit name, else the recipients' display names
    fn name(&self) -> Option<String> {
        let model = self.model.read();
        if let Some(name) = model.name.as_deref_value().filter(|name| !name.trim().is_empty()) {
            return Some(name.clone());
        }
        let names: Vec<&str> = model
            .recipients
            .value()
            .map(|recipients| recipients.iter().map(|user| user.display_name()).collect())
            .unwrap_or_default();
        (!names.is_empty()).then(|| names.join(", "))
    }
}

impl PrivateChannel for CachedPrivateChannel {
    fn last_message_id(&self) -> Option<Snowflake> {
        self.model.read().last_message_id.as_deref_value().copied()
    }
}

impl GroupDmChannel for CachedPrivateChannel {
    fn icon_hash(&self) -> Option<String> {
        self.model.read().icon.as_deref_value().cloned()
    }

    fn owner_id(&self) -> Option<Snowflake> {
        self.model.read().owner_id.value().copied()
    }

    fn recipient_ids(&self) -> Vec<Snowflake> {
        self.model
            .read()
            .recipients
            .value()
            .map(|recipients| recipients.iter().map(|user| user.id).collect())
            .unwrap_or_default()
    }
}

/// Any cached channel
#[derive(Debug, Clone)]
pub enum CachedChannel {
    Guild(CachedGuildChannel),
    Private(CachedPrivateChannel),
}

impl CachedChannel {
    /// `None` for a guild channel kind arriving without its guild id
    pub(crate) fn new(model: ChannelModel) -> Option<Self> {
        let id = model.id;
        if model.kind.is_private() {
            return Some(Self::Private(CachedPrivateChannel {
                id,
                model: share(model),
            }));
        }
        let guild_id = model.guild_id.value().copied()?;
        Some(Self::Guild(CachedGuildChannel {
            guild_id,
            id,
            model: share(model),
        }))
    }

    pub fn guild_id(&self) -> Option<Snowflake> {
        match self {
            Self::Guild(channel) => Some(channel.guild_id),
            Self::Private(_) => None,
        }
    }

    pub fn as_guild(&self) -> Option<&CachedGuildChannel> {
        match self {
            Self::Guild(channel) => Some(channel),
            Self::Private(_) => None,
        }
    }

    pub fn as_private(&self) -> Option<&CachedPrivateChannel> {
        match self {
            Self::Private(channel) => Some(channel),
            Self::Guild(_) => None,
        }
    }

    pub fn snapshot(&self) -> ChannelModel {
        match self {
            Self::Guild(channel) => channel.snapshot(),
            Self::Private(channel) => channel.snapshot(),
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Guild(a), Self::Guild(b)) => a.ptr_eq(b),
            (Self::Private(a), Self::Private(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    pub(crate) fn replace_with(&self, apply: impl FnOnce(&mut ChannelModel)) -> ChannelModel {
        match self {
            Self::Guild(channel) => channel.replace_with(apply),
            Self::Private(channel) => channel.replace_with(apply),
        }
    }
}

impl Entity for CachedChannel {
    fn id(&self) -> Snowflake {
        match self {
            Self::Guild(channel) => channel.id,
            Self::Private(channel) => channel.id,
        }
    }
}

impl Channel for CachedChannel {
    fn kind(&self) -> ChannelType {
        match self {
            Self::Guild(channel) => channel.kind(),
            Self::Private(channel) => channel.kind(),
        }
    }

    fn name(&self) -> Option<String> {
        match self {
            Self::Guild(channel) => channel.name(),
            Self::Private(channel) => channel.name(),
        }
    }
}
