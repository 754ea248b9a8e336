//! Role model

use serde::{Deserialize, Serialize};

use crate::value_objects::{Color, Optional, Permissions, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleModel {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub hoist: bool,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub icon: Optional<Option<String>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub unicode_emoji: Optional<Option<String>>,
    #[serde(default)]
    pub position: i32,
    pub permissions: Permissions,
    #[serde(default)]
    pub managed: bool,
    #[serde(default)]
    pub mentionable: bool,
}

impl RoleModel {
    /// The `@everyone` role shares its id with the guild
    pub fn is_everyone(&self, guild_id: Snowflake) -> bool {
        self.id == guild_id
    }

    /// Merge a newer copy of this role
    pub fn update(&mut self, update: &RoleModel) {
        self.name.clone_from(&update.name);
        self.color = update.color;
        self.hoist = update.hoist;
        self.icon.update_from(&update.icon);
        self.unicode_emoji.update_from(&update.unicode_emoji);
        self.position = update.position;
        self.permissions = update.permissions;
        self.managed = update.managed;
        self.mentionable = update.mentionable;
    }
}
