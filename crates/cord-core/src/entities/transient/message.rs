use chrono::{DateTime, Utc};

use super::{Embed, TransientUser};
use crate::entities::{Entity, Message};
use crate::models::MessageModel;
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientMessage {
    model: MessageModel,
}

impl TransientMessage {
    #[must_use]
    pub fn new(model: MessageModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &MessageModel {
        &self.model
    }

    pub fn author(&self) -> TransientUser {
        TransientUser::new(self.model.author.clone())
    }

    pub fn embeds(&self) -> Vec<Embed> {
        self.model.embeds.iter().cloned().map(Embed::new).collect()
    }
}

impl Entity for TransientMessage {
    fn id(&self) -> Snowflake {
        self.model.id
    }
}

impl Message for TransientMessage {
    fn channel_id(&self) -> Snowflake {
        self.model.channel_id
    }

    fn guild_id(&self) -> Option<Snowflake> {
        self.model.guild_id.value().copied()
    }

    fn author_id(&self) -> Snowflake {
        self.model.author.id
    }

    fn content(&self) -> String {
        self.model.content.clone()
    }

    fn is_pinned(&self) -> bool {
        self.model.pinned
    }

    fn edited_at(&self) -> Option<DateTime<Utc>> {
        self.model.edited_timestamp
    }
}
