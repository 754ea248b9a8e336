use chrono::{DateTime, Utc};
use cord_core::models::MessageModel;
use cord_core::{Entity, Message, Snowflake};

use super::{share, shared_handle, Shared};

#[derive(Debug, Clone)]
pub struct CachedMessage {
    id: Snowflake,
    channel_id: Snowflake,
    model: Shared<MessageModel>,
}

impl CachedMessage {
    pub(crate) fn new(model: MessageModel) -> Self {
        Self {
            id: model.id,
            channel_id: model.channel_id,
            model: share(model),
        }
    }
}

shared_handle!(CachedMessage, MessageModel);

impl Entity for CachedMessage {
    fn id(&self) -> Snowflake {
        self.id
    }
}

impl Message for CachedMessage {
    fn channel_id(&self) -> Snowflake {
        self.channel_id
    }

    fn guild_id(&self) -> Option<Snowflake> {
        self.model.read().guild_id.value().copied()
    }

    fn author_id(&self) -> Snowflake {
        self.model.read().author.id
    }

    fn content(&self) -> String {
        self.model.read().content.clone()
    }

    fn is_pinned(&self) -> bool {
        self.model.read().pinned
    }

    fn edited_at(&self) -> Option<DateTime<Utc>> {
        self.model.read().edited_timestamp
    }
}
