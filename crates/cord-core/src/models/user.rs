//! User model

use serde::{Deserialize, Serialize};

use crate::value_objects::{Optional, Snowflake};

/// A platform user, as sent in nearly every payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserModel {
    pub id: Snowflake,
    pub username: String,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub discriminator: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub global_name: Optional<Option<String>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub avatar: Optional<Option<String>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub bot: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub system: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub public_flags: Optional<u64>,
}

impl UserModel {
    /// Create a user with only the required fields set
    #[must_use]
    pub fn new(id: Snowflake, username: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            discriminator: Optional::Absent,
            global_name: Optional::Absent,
            avatar: Optional::Absent,
            bot: Optional::Absent,
            system: Optional::Absent,
            public_flags: Optional::Absent,
        }
    }

    /// Merge a newer copy of this user
    pub fn update(&mut self, update: &UserModel) {
        self.username.clone_from(&update.username);
        self.discriminator.update_from(&update.discriminator);
        self.global_name.update_from(&update.global_name);
        self.avatar.update_from(&update.avatar);
        self.bot.update_from(&update.bot);
        self.system.update_from(&update.system);
        self.public_flags.update_from(&update.public_flags);
    }

    /// Legacy discriminator, `"0"` for migrated accounts or when never sent
    pub fn discriminator(&self) -> &str {
        self.discriminator.value().map_or("0", String::as_str)
    }

    /// Name shown in clients: the global name when set, else the username
    pub fn display_name(&self) -> &str {
        self.global_name
            .as_deref_value()
            .map_or(self.username.as_str(), String::as_str)
    }

    /// Legacy `name#discriminator` tag, or just the username for migrated accounts
    pub fn tag(&self) -> String {
        match self.discriminator() {
            "0" => self.username.clone(),
            discriminator => format!("{}#{discriminator}", self.username),
        }
    }
}
