//! Application (slash) command models

use serde::{Deserialize, Serialize};

use super::int_enum;
use crate::value_objects::{Optional, Permissions, Snowflake};

int_enum! {
    pub enum ApplicationCommandType: u8 {
        /// Slash command
        ChatInput = 1,
        User = 2,
        Message = 3,
    }
}

int_enum! {
    pub enum ApplicationCommandOptionType: u8 {
        SubCommand = 1,
        SubCommandGroup = 2,
        String = 3,
        Integer = 4,
        Boolean = 5,
        User = 6,
        Channel = 7,
        Role = 8,
        Mentionable = 9,
        Number = 10,
        Attachment = 11,
    }
}

impl ApplicationCommandOptionType {
    /// Option kinds that may carry nested options
    pub fn is_container(self) -> bool {
        matches!(self, Self::SubCommand | Self::SubCommandGroup)
    }

    /// Option kinds that may carry choices
    pub fn supports_choices(self) -> bool {
        matches!(self, Self::String | Self::Integer | Self::Number)
    }
}

/// Value of a predefined choice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChoiceValue {
    Integer(i64),
    Number(f64),
    String(String),
}

impl From<&str> for ChoiceValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ChoiceValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for ChoiceValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for ChoiceValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCommandOptionChoiceModel {
    pub name: String,
    pub value: ChoiceValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCommandOptionModel {
    #[serde(rename = "type")]
    pub kind: ApplicationCommandOptionType,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub required: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub choices: Optional<Vec<ApplicationCommandOptionChoiceModel>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub options: Optional<Vec<ApplicationCommandOptionModel>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub min_value: Optional<f64>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub max_value: Optional<f64>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub min_length: Optional<u16>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub max_length: Optional<u16>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub autocomplete: Optional<bool>,
}

/// Application command, both as created and as returned
///
/// Server-assigned fields (`id`, `application_id`, `version`) are absent in
/// creation requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationCommandModel {
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub id: Optional<Snowflake>,
    #[serde(rename = "type", default, skip_serializing_if = "Optional::is_absent")]
    pub kind: Optional<ApplicationCommandType>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub application_id: Optional<Snowflake>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub guild_id: Optional<Snowflake>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub options: Optional<Vec<ApplicationCommandOptionModel>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub default_member_permissions: Optional<Option<Permissions>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub dm_permission: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub nsfw: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub version: Optional<Snowflake>,
}
