//! Stage instance model

use serde::{Deserialize, Serialize};

use super::int_enum;
use crate::value_objects::{Optional, Snowflake};

int_enum! {
    /// Who can see a stage instance
    pub enum StagePrivacyLevel: u8 {
        Public = 1,
        GuildOnly = 2,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageInstanceModel {
    pub id: Snowflake,
    pub guild_id: Snowflake,
    pub channel_id: Snowflake,
    pub topic: String,
    pub privacy_level: StagePrivacyLevel,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub discoverable_disabled: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub guild_scheduled_event_id: Optional<Option<Snowflake>>,
}

impl StageInstanceModel {
    pub fn update(&mut self, update: &StageInstanceModel) {
        self.topic.clone_from(&update.topic);
        self.privacy_level = update.privacy_level;
        self.discoverable_disabled
            .update_from(&update.discoverable_disabled);
        self.guild_scheduled_event_id
            .update_from(&update.guild_scheduled_event_id);
    }
}
