//! Message and interaction followup builders

use validator::Validate;

use crate::error::ArgumentError;
use crate::models::{
    AllowedMentionsModel, CreateFollowupMessageModel, CreateMessageModel, EmbedModel,
    ExecuteWebhookModel, MessageFlags, MessageReferenceModel,
};
use crate::value_objects::{Optional, Snowflake};

use super::LocalEmbed;

pub const MAX_CONTENT_LENGTH: usize = 2000;
pub const MAX_EMBEDS: usize = 10;

/// A message needs visible content or at least one embed
fn check_body(content: Option<&str>, embeds: &[LocalEmbed]) -> Result<Vec<EmbedModel>, ArgumentError> {
    if content.map_or(true, |content| content.trim().is_empty()) && embeds.is_empty() {
        return Err(ArgumentError::Empty { name: "content" });
    }
    embeds.iter().map(LocalEmbed::to_model).collect()
}

fn embeds_field(embeds: Vec<EmbedModel>) -> Optional<Vec<EmbedModel>> {
    if embeds.is_empty() {
        Optional::Absent
    } else {
        Optional::Present(embeds)
    }
}

/// Message to be sent to a channel
///
/// Mentions do not ping unless [`with_allowed_mentions`](Self::with_allowed_mentions)
/// says otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Default, Validate)]
pub struct LocalMessage {
    #[validate(length(max = 2000, message = "Message content must be at most 2000 characters"))]
    pub content: Option<String>,
    #[validate(length(max = 10, message = "Messages can have at most 10 embeds"), nested)]
    pub embeds: Vec<LocalEmbed>,
    pub is_tts: bool,
    pub allowed_mentions: Option<AllowedMentionsModel>,
    pub reference: Option<Snowflake>,
    pub flags: Option<MessageFlags>,
}

impl LocalMessage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn add_embed(mut self, embed: LocalEmbed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn with_embeds<I>(mut self, embeds: I) -> Self
    where
        I: IntoIterator<Item = LocalEmbed>,
    {
        self.embeds = embeds.into_iter().collect();
        self
    }

    pub fn with_is_tts(mut self, is_tts: bool) -> Self {
        self.is_tts = is_tts;
        self
    }

    pub fn with_allowed_mentions(mut self, allowed_mentions: AllowedMentionsModel) -> Self {
        self.allowed_mentions = Some(allowed_mentions);
        self
    }

    /// Reply to a message in the same channel
    pub fn with_reply_to(mut self, message_id: Snowflake) -> Self {
        self.reference = Some(message_id);
        self
    }

    pub fn with_flags(mut self, flags: MessageFlags) -> Self {
        self.flags = Some(flags);
        self
    }

    pub fn to_model(&self) -> Result<CreateMessageModel, ArgumentError> {
        self.validate()?;
        let embeds = check_body(self.content.as_deref(), &self.embeds)?;

        Ok(CreateMessageModel {
            content: Optional::from_option(self.content.clone()),
            tts: if self.is_tts {
                Optional::Present(true)
            } else {
                Optional::Absent
            },
            embeds: embeds_field(embeds),
            allowed_mentions: Optional::Present(self.allowed_mentions.clone().unwrap_or_default()),
            message_reference: Optional::from_option(self.reference.map(|message_id| {
                MessageReferenceModel {
                    message_id: Optional::Present(message_id),
                    ..MessageReferenceModel::default()
                }
            })),
            flags: Optional::from_option(self.flags),
        })
    }
}

/// Followup message for an interaction
#[derive(Debug, Clone, PartialEq, Eq, Default, Validate)]
pub struct LocalInteractionFollowup {
    #[validate(length(max = 2000, message = "Message content must be at most 2000 characters"))]
    pub content: Option<String>,
    #[validate(length(max = 10, message = "Messages can have at most 10 embeds"), nested)]
    pub embeds: Vec<LocalEmbed>,
    pub is_tts: bool,
    pub allowed_mentions: Option<AllowedMentionsModel>,
    pub is_ephemeral: bool,
}

impl LocalInteractionFollowup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn add_embed(mut self, embed: LocalEmbed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn with_is_tts(mut self, is_tts: bool) -> Self {
        self.is_tts = is_tts;
        self
    }

    pub fn with_allowed_mentions(mut self, allowed_mentions: AllowedMentionsModel) -> Self {
        self.allowed_mentions = Some(allowed_mentions);
        self
    }

    /// Only the invoking user will see the followup
    pub fn with_is_ephemeral(mut self, is_ephemeral: bool) -> Self {
        self.is_ephemeral = is_ephemeral;
        self
    }

    pub fn to_model(&self) -> Result<CreateFollowupMessageModel, ArgumentError> {
        self.validate()?;
        let embeds = check_body(self.content.as_deref(), &self.embeds)?;

        Ok(CreateFollowupMessageModel {
            webhook: ExecuteWebhookModel {
                content: Optional::from_option(self.content.clone()),
                username: Optional::Absent,
                avatar_url: Optional::Absent,
                tts: if self.is_tts {
                    Optional::Present(true)
                } else {
                    Optional::Absent
                },
                embeds: embeds_field(embeds),
                allowed_mentions: Optional::Present(
                    self.allowed_mentions.clone().unwrap_or_default(),
                ),
            },
            flags: if self.is_ephemeral {
                Optional::Present(MessageFlags::EPHEMERAL)
            } else {
                Optional::Absent
            },
        })
    }
}
