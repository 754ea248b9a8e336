//! Request bodies produced by local builders

use serde::{Deserialize, Serialize};

use super::{EmbedModel, MessageFlags, MessageReferenceModel};
use crate::value_objects::{Optional, Snowflake};

/// Which mentions in the content actually ping
///
/// The default parses nothing, so no one is pinged unless allowed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AllowedMentionsModel {
    #[serde(default)]
    pub parse: Vec<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub roles: Optional<Vec<Snowflake>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub users: Optional<Vec<Snowflake>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub replied_user: Optional<bool>,
}

impl AllowedMentionsModel {
    /// Allow `@everyone`, role and user mentions
    pub fn all() -> Self {
        Self {
            parse: vec!["everyone".to_string(), "roles".to_string(), "users".to_string()],
            ..Self::default()
        }
    }
}

/// Body of `POST /channels/{channel.id}/messages`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateMessageModel {
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub content: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub tts: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub embeds: Optional<Vec<EmbedModel>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub allowed_mentions: Optional<AllowedMentionsModel>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub message_reference: Optional<MessageReferenceModel>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub flags: Optional<MessageFlags>,
}

/// Body of `POST /webhooks/{webhook.id}/{webhook.token}`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecuteWebhookModel {
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub content: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub username: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub avatar_url: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub tts: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub embeds: Optional<Vec<EmbedModel>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub allowed_mentions: Optional<AllowedMentionsModel>,
}

/// Body of an interaction followup: a webhook execution plus message flags
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateFollowupMessageModel {
    #[serde(flatten)]
    pub webhook: ExecuteWebhookModel,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub flags: Optional<MessageFlags>,
}
