//! Channel model - one shape for every channel kind

use serde::{Deserialize, Serialize};

use super::{int_enum, UserModel};
use crate::value_objects::{Optional, Permissions, Snowflake};

int_enum! {
    /// Kind of channel
    pub enum ChannelType: u8 {
        GuildText = 0,
        Dm = 1,
        GuildVoice = 2,
        GroupDm = 3,
        GuildCategory = 4,
        GuildAnnouncement = 5,
        AnnouncementThread = 10,
        PublicThread = 11,
        PrivateThread = 12,
        GuildStageVoice = 13,
        GuildDirectory = 14,
        GuildForum = 15,
    }
}

impl ChannelType {
    /// Channels that live inside a guild
    pub fn is_guild(self) -> bool {
        !matches!(self, Self::Dm | Self::GroupDm)
    }

    /// Direct message and group DM channels
    pub fn is_private(self) -> bool {
        matches!(self, Self::Dm | Self::GroupDm)
    }

    pub fn is_thread(self) -> bool {
        matches!(
            self,
            Self::AnnouncementThread | Self::PublicThread | Self::PrivateThread
        )
    }
}

int_enum! {
    /// Target of a permission overwrite
    pub enum OverwriteType: u8 {
        Role = 0,
        Member = 1,
    }
}

/// Permission overwrite on a guild channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverwriteModel {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: OverwriteType,
    pub allow: Permissions,
    pub deny: Permissions,
}

/// Channel payload
///
/// Fields not meaningful for a channel kind are simply absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelModel {
    pub id: Snowflake,
    #[serde(rename = "type")]
    pub kind: ChannelType,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub guild_id: Optional<Snowflake>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub position: Optional<i32>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub permission_overwrites: Optional<Vec<OverwriteModel>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub name: Optional<Option<String>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub topic: Optional<Option<String>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub nsfw: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub last_message_id: Optional<Option<Snowflake>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub bitrate: Optional<u32>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub user_limit: Optional<u32>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub rate_limit_per_user: Optional<u32>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub recipients: Optional<Vec<UserModel>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub icon: Optional<Option<String>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub owner_id: Optional<Snowflake>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub parent_id: Optional<Option<Snowflake>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub default_auto_archive_duration: Optional<u32>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub rtc_region: Optional<Option<String>>,
}

impl ChannelModel {
    /// Create a channel with only the required fields set
    #[must_use]
    pub fn new(id: Snowflake, kind: ChannelType) -> Self {
        Self {
            id,
            kind,
            guild_id: Optional::Absent,
            position: Optional::Absent,
            permission_overwrites: Optional::Absent,
            name: Optional::Absent,
            topic: Optional::Absent,
            nsfw: Optional::Absent,
            last_message_id: Optional::Absent,
            bitrate: Optional::Absent,
            user_limit: Optional::Absent,
            rate_limit_per_user: Optional::Absent,
            recipients: Optional::Absent,
            icon: Optional::Absent,
            owner_id: Optional::Absent,
            parent_id: Optional::Absent,
            default_auto_archive_duration: Optional::Absent,
            rtc_region: Optional::Absent,
        }
    }

    /// Merge a partial or newer copy of this channel
    pub fn update(&mut self, update: &ChannelModel) {
        self.kind = update.kind;
        self.guild_id.update_from(&update.guild_id);
        self.position.update_from(&update.position);
        self.permission_overwrites
            .update_from(&update.permission_overwrites);
        self.name.update_from(&update.name);
        self.topic.update_from(&update.topic);
        self.nsfw.update_from(&update.nsfw);
        self.last_message_id.update_from(&update.last_message_id);
        self.bitrate.update_from(&update.bitrate);
        self.user_limit.update_from(&update.user_limit);
        self.rate_limit_per_user.update_from(&update.rate_limit_per_user);
        self.recipients.update_from(&update.recipients);
        self.icon.update_from(&update.icon);
        self.owner_id.update_from(&update.owner_id);
        self.parent_id.update_from(&update.parent_id);
        self.default_auto_archive_duration
            .update_from(&update.default_auto_archive_duration);
        self.rtc_region.update_from(&update.rtc_region);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_type_values() {
        assert_eq!(u8::from(ChannelType::GuildForum), 15);
        assert_eq!(ChannelType::from(3), ChannelType::GroupDm);
        assert_eq!(ChannelType::from(99), ChannelType::Unknown(99));
        assert!(ChannelType::GroupDm.is_private());
        assert!(ChannelType::PublicThread.is_thread());
        assert!(ChannelType::GuildVoice.is_guild());
    }

    #[test]
    fn test_deserialize_text_channel() {
        let channel: ChannelModel = serde_json::from_str(
            r#"{
                "id": "41771983423143937",
                "guild_id": "41771983423143937",
                "name": "general",
                "type": 0,
                "position": 6,
                "permission_overwrites": [{"id": "1", "type": 1, "allow": "1024", "deny": "0"}],
                "rate_limit_per_user": 2,
                "nsfw": true,
                "topic": null,
                "parent_id": "399942396007890945"
            }"#,
        )
        .unwrap();

        assert_eq!(channel.kind, ChannelType::GuildText);
        assert_eq!(channel.topic, Optional::Present(None));
        assert_eq!(channel.rate_limit_per_user, Optional::Present(2));
        let overwrites = channel.permission_overwrites.value().unwrap();
        assert_eq!(overwrites[0].kind, OverwriteType::Member);
        assert!(overwrites[0].allow.contains(Permissions::VIEW_CHANNEL));
        assert!(channel.bitrate.is_absent());
    }

    #[test]
    fn test_update_merges_present_fields_only() {
        let mut channel = ChannelModel::new(Snowflake::new(1), ChannelType::GuildText);
        channel.name = Optional::Present(Some("general".to_string()));
        channel.topic = Optional::Present(Some("welcome".to_string()));

        let mut update = ChannelModel::new(Snowflake::new(1), ChannelType::GuildText);
        update.topic = Optional::Present(None);
        update.nsfw = Optional::Present(true);

        channel.update(&update);

        assert_eq!(channel.name.as_deref_value().map(String::as_str), Some("general"));
        assert_eq!(channel.topic, Optional::Present(None));
        assert_eq!(channel.nsfw, Optional::Present(true));
    }

    #[test]
    fn test_serialize_skips_absent() {
        let mut channel = ChannelModel::new(Snowflake::new(5), ChannelType::Dm);
        channel.last_message_id = Optional::Present(None);
        let json = serde_json::to_value(&channel).unwrap();
        assert_eq!(json, serde_json::json!({"id": "5", "type": 1, "last_message_id": null}));
    }
}
