//! Guild models

use serde::{Deserialize, Serialize};

use super::{ChannelModel, MemberModel, RoleModel};
use crate::value_objects::{Optional, Snowflake};

/// Guild payload
///
/// `members`, `channels` and `threads` are only sent with the gateway's
/// `GUILD_CREATE`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildModel {
    pub id: Snowflake,
    pub name: String,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub icon: Optional<Option<String>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub owner_id: Optional<Snowflake>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub afk_channel_id: Optional<Option<Snowflake>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub afk_timeout: Optional<u32>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub verification_level: Optional<u8>,
    #[serde(default)]
    pub roles: Vec<RoleModel>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub system_channel_id: Optional<Option<Snowflake>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub description: Optional<Option<String>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub preferred_locale: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub member_count: Optional<u32>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub large: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub unavailable: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub members: Optional<Vec<MemberModel>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub channels: Optional<Vec<ChannelModel>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub threads: Optional<Vec<ChannelModel>>,
}

impl GuildModel {
    /// Create a guild with only the required fields set
    #[must_use]
    pub fn new(id: Snowflake, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            icon: Optional::Absent,
            owner_id: Optional::Absent,
            afk_channel_id: Optional::Absent,
            afk_timeout: Optional::Absent,
            verification_level: Optional::Absent,
            roles: Vec::new(),
            features: Vec::new(),
            system_channel_id: Optional::Absent,
            description: Optional::Absent,
            preferred_locale: Optional::Absent,
            member_count: Optional::Absent,
            large: Optional::Absent,
            unavailable: Optional::Absent,
            members: Optional::Absent,
            channels: Optional::Absent,
            threads: Optional::Absent,
        }
    }

    /// Merge the guild-level fields of a newer copy
    ///
    /// Roles, members and channels are tracked as separate cache entries and
    /// are not merged here.
    pub fn update(&mut self, update: &GuildModel) {
        self.name.clone_from(&update.name);
        self.icon.update_from(&update.icon);
        self.owner_id.update_from(&update.owner_id);
        self.afk_channel_id.update_from(&update.afk_channel_id);
        self.afk_timeout.update_from(&update.afk_timeout);
        self.verification_level.update_from(&update.verification_level);
        if !update.features.is_empty() {
            self.features.clone_from(&update.features);
        }
        self.system_channel_id.update_from(&update.system_channel_id);
        self.description.update_from(&update.description);
        self.preferred_locale.update_from(&update.preferred_locale);
        self.member_count.update_from(&update.member_count);
        self.large.update_from(&update.large);
        self.unavailable.update_from(&update.unavailable);
    }
}

/// Guild that is offline or not yet streamed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailableGuildModel {
    pub id: Snowflake,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub unavailable: Optional<bool>,
}

impl UnavailableGuildModel {
    /// `true` when the guild is unavailable due to an outage, not removal
    pub fn is_outage(&self) -> bool {
        self.unavailable.get_or(false)
    }
}
