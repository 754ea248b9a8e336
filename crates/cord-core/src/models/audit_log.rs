//! Audit log models

use serde::{Deserialize, Serialize};

use super::{int_enum, UserModel};
use crate::value_objects::{Optional, Snowflake};

int_enum! {
    /// Kind of action an audit log entry records
    pub enum AuditLogActionType: u16 {
        GuildUpdate = 1,
        ChannelCreate = 10,
        ChannelUpdate = 11,
        ChannelDelete = 12,
        ChannelOverwriteCreate = 13,
        ChannelOverwriteUpdate = 14,
        ChannelOverwriteDelete = 15,
        MemberKick = 20,
        MemberPrune = 21,
        MemberBanAdd = 22,
        MemberBanRemove = 23,
        MemberUpdate = 24,
        MemberRoleUpdate = 25,
        MemberMove = 26,
        MemberDisconnect = 27,
        BotAdd = 28,
        RoleCreate = 30,
        RoleUpdate = 31,
        RoleDelete = 32,
        InviteCreate = 40,
        InviteUpdate = 41,
        InviteDelete = 42,
        WebhookCreate = 50,
        WebhookUpdate = 51,
        WebhookDelete = 52,
        EmojiCreate = 60,
        EmojiUpdate = 61,
        EmojiDelete = 62,
        MessageDelete = 72,
        MessageBulkDelete = 73,
        MessagePin = 74,
        MessageUnpin = 75,
        IntegrationCreate = 80,
        IntegrationUpdate = 81,
        IntegrationDelete = 82,
        StageInstanceCreate = 83,
        StageInstanceUpdate = 84,
        StageInstanceDelete = 85,
    }
}

/// One changed key; values keep their raw JSON shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogChangeModel {
    pub key: String,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub new_value: Optional<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub old_value: Optional<serde_json::Value>,
}

/// Extra information attached to some action types
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditLogEntryInfoModel {
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub channel_id: Optional<Snowflake>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub message_id: Optional<Snowflake>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub count: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub delete_member_days: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub members_removed: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub id: Optional<Snowflake>,
    #[serde(rename = "type", default, skip_serializing_if = "Optional::is_absent")]
    pub kind: Optional<String>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub role_name: Optional<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntryModel {
    pub id: Snowflake,
    /// Not always a snowflake, so kept as the raw string
    pub target_id: Option<String>,
    pub user_id: Option<Snowflake>,
    pub action_type: AuditLogActionType,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub changes: Optional<Vec<AuditLogChangeModel>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub options: Optional<AuditLogEntryInfoModel>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub reason: Optional<String>,
}

impl AuditLogEntryModel {
    /// Target id parsed as a snowflake, when it is one
    pub fn target_snowflake(&self) -> Option<Snowflake> {
        self.target_id.as_deref().and_then(|id| id.parse().ok())
    }
}

/// One page of a guild's audit log
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AuditLogModel {
    #[serde(default)]
    pub audit_log_entries: Vec<AuditLogEntryModel>,
    #[serde(default)]
    pub users: Vec<UserModel>,
    #[serde(default)]
    pub webhooks: Vec<serde_json::Value>,
    #[serde(default)]
    pub integrations: Vec<serde_json::Value>,
    #[serde(default)]
    pub threads: Vec<serde_json::Value>,
}

impl AuditLogModel {
    /// Look up a user referenced by an entry
    pub fn user(&self, id: Snowflake) -> Option<&UserModel> {
        self.users.iter().find(|user| user.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_audit_log() {
        let log: AuditLogModel = serde_json::from_str(
            r#"{
                "audit_log_entries": [{
                    "id": "1",
                    "target_id": "42",
                    "user_id": "7",
                    "action_type": 22,
                    "reason": "spam",
                    "changes": [{"key": "nick", "old_value": "a", "new_value": "b"}]
                }, {
                    "id": "2",
                    "target_id": null,
                    "user_id": "7",
                    "action_type": 9000
                }],
                "users": [{"id": "7", "username": "mod"}]
            }"#,
        )
        .unwrap();

        let entry = &log.audit_log_entries[0];
        assert_eq!(entry.action_type, AuditLogActionType::MemberBanAdd);
        assert_eq!(entry.target_snowflake(), Some(Snowflake::new(42)));
        assert_eq!(entry.reason.value().map(String::as_str), Some("spam"));
        assert_eq!(
            log.audit_log_entries[1].action_type,
            AuditLogActionType::Unknown(9000)
        );
        assert_eq!(log.user(Snowflake::new(7)).unwrap().username, "mod");
    }
}
