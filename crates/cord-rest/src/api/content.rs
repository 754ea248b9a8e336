//! JSON request bodies
//!
//! Core request models are sent as-is; the contents below exist only on
//! the REST side.

use cord_core::models::{
    ApplicationCommandModel, ChannelType, CreateFollowupMessageModel, CreateMessageModel,
    ExecuteWebhookModel, OverwriteModel, StagePrivacyLevel,
};
use cord_core::{ArgumentError, Optional, Snowflake};
use serde::Serialize;
use validator::Validate;

/// A body that can be serialized to JSON and checked before sending
pub trait JsonRequestContent: Serialize + Send + Sync {
    fn check(&self) -> Result<(), ArgumentError> {
        Ok(())
    }

    fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl JsonRequestContent for CreateMessageModel {}
impl JsonRequestContent for ExecuteWebhookModel {}
impl JsonRequestContent for CreateFollowupMessageModel {}
impl JsonRequestContent for ApplicationCommandModel {}
impl JsonRequestContent for serde_json::Value {}

// ============================================================================
// Channels
// ============================================================================

/// Properties shared by every channel kind nested under a category
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NestedChannelProperties {
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub parent_id: Optional<Snowflake>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub position: Optional<i32>,
    #[serde(rename = "permission_overwrites", skip_serializing_if = "Optional::is_absent")]
    pub overwrites: Optional<Vec<OverwriteModel>>,
}

/// Text channel creation options
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateTextChannelActionProperties {
    pub nested: NestedChannelProperties,
    pub topic: Optional<String>,
    /// Seconds a member must wait between messages
    pub slowmode: Optional<u32>,
    pub is_nsfw: Optional<bool>,
    /// Minutes of inactivity before new threads archive
    pub default_auto_archive_duration: Optional<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateVoiceChannelActionProperties {
    pub nested: NestedChannelProperties,
    pub bitrate: Optional<u32>,
    pub user_limit: Optional<u32>,
    pub rtc_region: Optional<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateCategoryChannelActionProperties {
    pub position: Optional<i32>,
    pub overwrites: Optional<Vec<OverwriteModel>>,
}

/// Body of `POST /guilds/{guild.id}/channels`
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct CreateGuildChannelContent {
    #[validate(length(min = 1, max = 100, message = "Channel names must be 1-100 characters"))]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ChannelType,
    #[serde(flatten)]
    pub nested: NestedChannelProperties,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    #[validate(length(max = 1024, message = "Channel topics must be at most 1024 characters"))]
    pub topic: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    #[validate(range(min = 0, max = 21_600, message = "Slowmode must be 0-21600 seconds"))]
    pub rate_limit_per_user: Optional<u32>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub nsfw: Optional<bool>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub default_auto_archive_duration: Optional<u32>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub bitrate: Optional<u32>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    #[validate(range(min = 0, max = 99, message = "User limit must be 0-99"))]
    pub user_limit: Optional<u32>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub rtc_region: Optional<Option<String>>,
}

impl CreateGuildChannelContent {
    fn base(name: impl Into<String>, kind: ChannelType, nested: NestedChannelProperties) -> Self {
        Self {
            name: name.into(),
            kind,
            nested,
            topic: Optional::Absent,
            rate_limit_per_user: Optional::Absent,
            nsfw: Optional::Absent,
            default_auto_archive_duration: Optional::Absent,
            bitrate: Optional::Absent,
            user_limit: Optional::Absent,
            rtc_region: Optional::Absent,
        }
    }

    pub fn text(name: impl Into<String>, properties: CreateTextChannelActionProperties) -> Self {
        Self {
            topic: properties.topic,
            rate_limit_per_user: properties.slowmode,
            nsfw: properties.is_nsfw,
            default_auto_archive_duration: properties.default_auto_archive_duration,
            ..Self::base(name, ChannelType::GuildText, properties.nested)
        }
    }

    pub fn voice(name: impl Into<String>, properties: CreateVoiceChannelActionProperties) -> Self {
        Self {
            bitrate: properties.bitrate,
            user_limit: properties.user_limit,
            rtc_region: properties.rtc_region,
            ..Self::base(name, ChannelType::GuildVoice, properties.nested)
        }
    }

    pub fn category(
        name: impl Into<String>,
        properties: CreateCategoryChannelActionProperties,
    ) -> Self {
        let nested = NestedChannelProperties {
            parent_id: Optional::Absent,
            position: properties.position,
            overwrites: properties.overwrites,
        };
        Self::base(name, ChannelType::GuildCategory, nested)
    }
}

impl JsonRequestContent for CreateGuildChannelContent {
    fn check(&self) -> Result<(), ArgumentError> {
        Ok(self.validate()?)
    }
}

/// Body of `PATCH /channels/{channel.id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct ModifyChannelContent {
    #[serde(skip_serializing_if = "Optional::is_absent")]
    #[validate(length(min = 1, max = 100, message = "Channel names must be 1-100 characters"))]
    pub name: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    #[validate(length(max = 1024, message = "Channel topics must be at most 1024 characters"))]
    pub topic: Optional<Option<String>>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub position: Optional<i32>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub nsfw: Optional<bool>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub rate_limit_per_user: Optional<u32>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub parent_id: Optional<Option<Snowflake>>,
}

impl JsonRequestContent for ModifyChannelContent {
    fn check(&self) -> Result<(), ArgumentError> {
        Ok(self.validate()?)
    }
}

// ============================================================================
// Messages
// ============================================================================

/// Body of `PATCH /channels/{channel.id}/messages/{message.id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct ModifyMessageContent {
    #[serde(skip_serializing_if = "Optional::is_absent")]
    #[validate(length(max = 2000, message = "Message content must be at most 2000 characters"))]
    pub content: Optional<Option<String>>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    #[validate(length(max = 10, message = "Messages can have at most 10 embeds"))]
    pub embeds: Optional<Vec<cord_core::models::EmbedModel>>,
}

impl JsonRequestContent for ModifyMessageContent {
    fn check(&self) -> Result<(), ArgumentError> {
        Ok(self.validate()?)
    }
}

/// Body of `POST /users/@me/channels`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CreateDirectChannelContent {
    pub recipient_id: Snowflake,
}

impl JsonRequestContent for CreateDirectChannelContent {}

// ============================================================================
// Moderation
// ============================================================================

/// Body of `PUT /guilds/{guild.id}/bans/{user.id}`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Validate)]
pub struct CreateBanContent {
    #[serde(skip_serializing_if = "Optional::is_absent")]
    #[validate(range(min = 0, max = 604_800, message = "Deleted message history must be 0-604800 seconds"))]
    pub delete_message_seconds: Optional<u32>,
}

impl JsonRequestContent for CreateBanContent {
    fn check(&self) -> Result<(), ArgumentError> {
        Ok(self.validate()?)
    }
}

// ============================================================================
// Stage instances
// ============================================================================

/// Body of `PATCH /stage-instances/{channel.id}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
pub struct ModifyStageInstanceContent {
    #[serde(skip_serializing_if = "Optional::is_absent")]
    #[validate(length(min = 1, max = 120, message = "Stage topics must be 1-120 characters"))]
    pub topic: Optional<String>,
    #[serde(skip_serializing_if = "Optional::is_absent")]
    pub privacy_level: Optional<StagePrivacyLevel>,
}

impl ModifyStageInstanceContent {
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Optional::Present(topic.into());
        self
    }

    pub fn with_privacy_level(mut self, privacy_level: StagePrivacyLevel) -> Self {
        self.privacy_level = Optional::Present(privacy_level);
        self
    }
}

impl JsonRequestContent for ModifyStageInstanceContent {
    fn check(&self) -> Result<(), ArgumentError> {
        Ok(self.validate()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_channel_content() {
        let content = CreateGuildChannelContent::text(
            "general",
            CreateTextChannelActionProperties {
                topic: Optional::Present("chat".to_string()),
                slowmode: Optional::Present(10),
                nested: NestedChannelProperties {
                    parent_id: Optional::Present(Snowflake::new(5)),
                    ..Default::default()
                },
                ..Default::default()
            },
        );
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "general",
                "type": 0,
                "parent_id": "5",
                "topic": "chat",
                "rate_limit_per_user": 10
            })
        );
        assert!(content.check().is_ok());
    }

    #[test]
    fn test_category_content() {
        let content = CreateGuildChannelContent::category(
            "Info",
            CreateCategoryChannelActionProperties {
                position: Optional::Present(2),
                ..Default::default()
            },
        );
        let value = serde_json::to_value(&content).unwrap();
        assert_eq!(value, json!({ "name": "Info", "type": 4, "position": 2 }));
    }

    #[test]
    fn test_voice_content_validation() {
        let content = CreateGuildChannelContent::voice(
            "Voice",
            CreateVoiceChannelActionProperties {
                user_limit: Optional::Present(150),
                ..Default::default()
            },
        );
        assert_eq!(
            content.check(),
            Err(ArgumentError::Validation(
                "user_limit: User limit must be 0-99".to_string()
            ))
        );
        assert!(CreateGuildChannelContent::text("", Default::default())
            .check()
            .is_err());
    }

    #[test]
    fn test_modify_stage_instance() {
        let content = ModifyStageInstanceContent::default()
            .with_topic("Town hall")
            .with_privacy_level(StagePrivacyLevel::GuildOnly);
        assert_eq!(
            serde_json::to_value(&content).unwrap(),
            json!({ "topic": "Town hall", "privacy_level": 2 })
        );
        assert!(ModifyStageInstanceContent::default()
            .with_topic("")
            .check()
            .is_err());
    }

    #[test]
    fn test_modify_channel_clears_topic() {
        let content = ModifyChannelContent {
            topic: Optional::Present(None),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&content).unwrap(), json!({ "topic": null }));
        assert!(content.check().is_ok());

        let content = ModifyChannelContent {
            topic: Optional::Present(Some("x".repeat(1025))),
            ..Default::default()
        };
        assert_eq!(
            content.check(),
            Err(ArgumentError::Validation(
                "topic: Channel topics must be at most 1024 characters".to_string()
            ))
        );
    }

    #[test]
    fn test_modify_message_limits() {
        assert!(ModifyMessageContent::default().check().is_ok());
        let content = ModifyMessageContent {
            content: Optional::Present(Some("x".repeat(2001))),
            ..Default::default()
        };
        assert_eq!(
            content.check(),
            Err(ArgumentError::Validation(
                "content: Message content must be at most 2000 characters".to_string()
            ))
        );
    }

    #[test]
    fn test_ban_content() {
        let content = CreateBanContent {
            delete_message_seconds: Optional::Present(700_000),
        };
        assert!(content.check().is_err());
        assert_eq!(
            serde_json::to_value(CreateBanContent::default()).unwrap(),
            json!({})
        );
    }
}
