//! Message models

use bitflags::bitflags;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{EmbedModel, MemberModel, UserModel};
use crate::value_objects::{Optional, Snowflake};

bitflags! {
    /// Message flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MessageFlags: u64 {
        const CROSSPOSTED = 1 << 0;
        const IS_CROSSPOST = 1 << 1;
        const SUPPRESS_EMBEDS = 1 << 2;
        const SOURCE_MESSAGE_DELETED = 1 << 3;
        const URGENT = 1 << 4;
        const HAS_THREAD = 1 << 5;
        /// Only visible to the user who invoked the interaction
        const EPHEMERAL = 1 << 6;
        const LOADING = 1 << 7;
        const SUPPRESS_NOTIFICATIONS = 1 << 12;
    }
}

impl Serialize for MessageFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.bits())
    }
}

impl<'de> Deserialize<'de> for MessageFlags {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        u64::deserialize(deserializer).map(Self::from_bits_retain)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentModel {
    pub id: Snowflake,
    pub filename: String,
    pub size: u64,
    pub url: String,
    pub proxy_url: String,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub content_type: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub height: Optional<Option<u32>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub width: Optional<Option<u32>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub ephemeral: Optional<bool>,
}

/// Custom or unicode emoji as used in reactions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmojiModel {
    pub id: Option<Snowflake>,
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub animated: Optional<bool>,
}

impl EmojiModel {
    /// Form used in reaction routes: `name:id` for custom emoji, else the name
    pub fn reaction_key(&self) -> String {
        match (&self.name, self.id) {
            (Some(name), Some(id)) => format!("{name}:{id}"),
            (Some(name), None) => name.clone(),
            (None, Some(id)) => format!("_:{id}"),
            (None, None) => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionModel {
    pub count: u32,
    pub me: bool,
    pub emoji: EmojiModel,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MessageReferenceModel {
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub message_id: Optional<Snowflake>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub channel_id: Optional<Snowflake>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub guild_id: Optional<Snowflake>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub fail_if_not_exists: Optional<bool>,
}

/// Full message payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageModel {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub guild_id: Optional<Snowflake>,
    pub author: UserModel,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub member: Optional<MemberModel>,
    #[serde(default)]
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub edited_timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tts: bool,
    #[serde(default)]
    pub mention_everyone: bool,
    #[serde(default)]
    pub mentions: Vec<UserModel>,
    #[serde(default)]
    pub mention_roles: Vec<Snowflake>,
    #[serde(default)]
    pub attachments: Vec<AttachmentModel>,
    #[serde(default)]
    pub embeds: Vec<EmbedModel>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub reactions: Optional<Vec<ReactionModel>>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub webhook_id: Optional<Snowflake>,
    #[serde(rename = "type", default)]
    pub kind: u8,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub flags: Optional<MessageFlags>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub message_reference: Optional<MessageReferenceModel>,
}

/// Partial message sent with `MESSAGE_UPDATE`
///
/// Only `id` and `channel_id` are guaranteed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialMessageModel {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub guild_id: Optional<Snowflake>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub author: Optional<UserModel>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub content: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub edited_timestamp: Optional<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub mention_everyone: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub mentions: Optional<Vec<UserModel>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub attachments: Optional<Vec<AttachmentModel>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub embeds: Optional<Vec<EmbedModel>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub pinned: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub flags: Optional<MessageFlags>,
}

impl MessageModel {
    /// Apply a partial update from the gateway
    pub fn update(&mut self, update: &PartialMessageModel) {
        if let Optional::Present(author) = &update.author {
            self.author.update(author);
        }
        if let Optional::Present(content) = &update.content {
            self.content.clone_from(content);
        }
        if let Optional::Present(edited) = update.edited_timestamp {
            self.edited_timestamp = edited;
        }
        if let Optional::Present(mention_everyone) = update.mention_everyone {
            self.mention_everyone = mention_everyone;
        }
        if let Optional::Present(mentions) = &update.mentions {
            self.mentions.clone_from(mentions);
        }
        if let Optional::Present(attachments) = &update.attachments {
            self.attachments.clone_from(attachments);
        }
        if let Optional::Present(embeds) = &update.embeds {
            self.embeds.clone_from(embeds);
        }
        if let Optional::Present(pinned) = update.pinned {
            self.pinned = pinned;
        }
        self.flags.update_from(&update.flags);
    }

    pub fn is_edited(&self) -> bool {
        self.edited_timestamp.is_some()
    }
}
