//! Interaction model

use serde::{Deserialize, Serialize};

use super::{int_enum, MemberModel, MessageModel, UserModel};
use crate::value_objects::{Optional, Snowflake};

int_enum! {
    pub enum InteractionType: u8 {
        Ping = 1,
        ApplicationCommand = 2,
        MessageComponent = 3,
        ApplicationCommandAutocomplete = 4,
        ModalSubmit = 5,
    }
}

/// Incoming interaction
///
/// `data` is kept as raw JSON; its shape depends on the interaction type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionModel {
    pub id: Snowflake,
    pub application_id: Snowflake,
    #[serde(rename = "type")]
    pub kind: InteractionType,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub data: Optional<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub guild_id: Optional<Snowflake>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub channel_id: Optional<Snowflake>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub member: Optional<MemberModel>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub user: Optional<UserModel>,
    pub token: String,
    #[serde(default)]
    pub version: u8,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub message: Optional<MessageModel>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub locale: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub guild_locale: Optional<String>,
}

impl InteractionModel {
    /// The invoking user, from `member` in guilds or `user` in DMs
    pub fn author(&self) -> Option<&UserModel> {
        self.member
            .value()
            .and_then(|member| member.user.value())
            .or_else(|| self.user.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_from_member() {
        let interaction: InteractionModel = serde_json::from_str(
            r#"{"id": "1", "application_id": "2", "type": 2, "token": "tok", "version": 1,
                "guild_id": "3", "data": {"name": "blep"},
                "member": {"user": {"id": "4", "username": "nelly"}, "roles": []}}"#,
        )
        .unwrap();
        assert_eq!(interaction.kind, InteractionType::ApplicationCommand);
        assert_eq!(interaction.author().map(|u| u.id), Some(Snowflake::new(4)));
    }

    #[test]
    fn test_author_from_user() {
        let interaction: InteractionModel = serde_json::from_str(
            r#"{"id": "1", "application_id": "2", "type": 1, "token": "tok",
                "user": {"id": "5", "username": "dm"}}"#,
        )
        .unwrap();
        assert_eq!(interaction.author().map(|u| u.id), Some(Snowflake::new(5)));
    }
}
