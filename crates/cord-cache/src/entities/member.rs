use chrono::{DateTime, Utc};
use cord_core::models::MemberModel;
use cord_core::{Entity, Member, Snowflake, User};

use super::{share, shared_handle, Shared};

/// Guild member
///
/// User fields are read from the user embedded in the member payload.
#[derive(Debug, Clone)]
pub struct CachedMember {
    guild_id: Snowflake,
    user_id: Snowflake,
    model: Shared<MemberModel>,
}

impl CachedMember {
    /// `None` when the payload carries no user
    pub(crate) fn new(guild_id: Snowflake, model: MemberModel) -> Option<Self> {
        let user_id = model.user_id()?;
        Some(Self {
            guild_id,
            user_id,
            model: share(model),
        })
    }

    /// Member timeout expiry
    pub fn timed_out_until(&self) -> Option<DateTime<Utc>> {
        self.model.read().communication_disabled_until.flatten()
    }

    pub fn is_pending(&self) -> bool {
        self.model.read().pending.get_or(false)
    }

    fn user_field<T>(&self, read: impl FnOnce(&cord_core::models::UserModel) -> T) -> Option<T> {
        self.model.read().user.value().map(read)
    }
}

shared_handle!(CachedMember, MemberModel);

impl Entity for CachedMember {
    fn id(&self) -> Snowflake {
        self.user_id
    }
}

impl User for CachedMember {
    fn name(&self) -> String {
        self.user_field(|user| user.username.clone()).unwrap_or_default()
    }

    fn discriminator(&self) -> String {
        self.user_field(|user| user.discriminator().to_string())
            .unwrap_or_default()
    }

    fn global_name(&self) -> Option<String> {
        self.user_field(|user| user.global_name.as_deref_value().cloned())
            .flatten()
    }

    fn avatar_hash(&self) -> Option<String> {
        let model = self.model.read();
        model
            .avatar
            .as_deref_value()
            .or_else(|| model.user.value().and_then(|user| user.avatar.as_deref_value()))
            .cloned()
    }

    fn is_bot(&self) -> bool {
        self.user_field(|user| user.bot.get_or(false)).unwrap_or(false)
    }

    /// Nickname, then global name, then username
    fn display_name(&self) -> String {
        self.nick()
            .or_else(|| self.global_name())
            .unwrap_or_else(|| self.name())
    }
}

impl Member for CachedMember {
    fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    fn nick(&self) -> Option<String> {
        self.model.read().nick.as_deref_value().cloned()
    }

    fn role_ids(&self) -> Vec<Snowflake> {
        self.model.read().role_ids().to_vec()
    }

    fn joined_at(&self) -> Option<DateTime<Utc>> {
        self.model.read().joined_at.flatten()
    }
}
