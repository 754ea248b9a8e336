//! Guild member model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::UserModel;
use crate::value_objects::{Optional, Snowflake};

/// A user's membership in one guild
///
/// `user` is absent when the member is embedded in a message payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberModel {
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub user: Optional<UserModel>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub nick: Optional<Option<String>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub avatar: Optional<Option<String>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub roles: Optional<Vec<Snowflake>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub joined_at: Optional<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub premium_since: Optional<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub deaf: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub mute: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub pending: Optional<bool>,
    #[serde(default, skip_serializing_if = "Optional::is_absent")]
    pub communication_disabled_until: Optional<Option<DateTime<Utc>>>,
}

impl MemberModel {
    /// Create a member for a user with no roles
    #[must_use]
    pub fn new(user: UserModel) -> Self {
        Self {
            user: Optional::Present(user),
            nick: Optional::Absent,
            avatar: Optional::Absent,
            roles: Optional::Present(Vec::new()),
            joined_at: Optional::Absent,
            premium_since: Optional::Absent,
            deaf: Optional::Absent,
            mute: Optional::Absent,
            pending: Optional::Absent,
            communication_disabled_until: Optional::Absent,
        }
    }

    /// Id of the member's user, when the payload carried one
    pub fn user_id(&self) -> Option<Snowflake> {
        self.user.value().map(|user| user.id)
    }

    /// Role ids, empty when the payload omitted them
    pub fn role_ids(&self) -> &[Snowflake] {
        self.roles.value().map(Vec::as_slice).unwrap_or_default()
    }

    /// Merge a partial or newer copy of this member
    pub fn update(&mut self, update: &MemberModel) {
        match (&mut self.user, &update.user) {
            (Optional::Present(user), Optional::Present(updated)) => user.update(updated),
            (user, updated) => user.update_from(updated),
        }
        self.nick.update_from(&update.nick);
        self.avatar.update_from(&update.avatar);
        self.roles.update_from(&update.roles);
        self.joined_at.update_from(&update.joined_at);
        self.premium_since.update_from(&update.premium_since);
        self.deaf.update_from(&update.deaf);
        self.mute.update_from(&update.mute);
        self.pending.update_from(&update.pending);
        self.communication_disabled_until
            .update_from(&update.communication_disabled_until);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_merges_user_and_keeps_join_date() {
        let mut member: MemberModel = serde_json::from_str(
            r#"{"user": {"id": "7", "username": "nelly", "avatar": "abc"},
                "nick": null, "roles": ["1"], "joined_at": "2015-04-26T06:26:56.936000+00:00",
                "deaf": false, "mute": false}"#,
        )
        .unwrap();
        let update: MemberModel = serde_json::from_str(
            r#"{"user": {"id": "7", "username": "nelly"}, "nick": "nel", "roles": ["1", "2"]}"#,
        )
        .unwrap();

        member.update(&update);

        assert_eq!(member.user_id(), Some(Snowflake::new(7)));
        assert_eq!(member.nick.as_deref_value().map(String::as_str), Some("nel"));
        assert_eq!(member.role_ids().len(), 2);
        assert!(member.joined_at.as_deref_value().is_some());
        let user = member.user.value().unwrap();
        assert_eq!(user.avatar.as_deref_value().map(String::as_str), Some("abc"));
    }

    #[test]
    fn test_update_without_roles_keeps_them() {
        let mut member: MemberModel = serde_json::from_str(
            r#"{"user": {"id": "7", "username": "nelly"}, "roles": ["1", "2"]}"#,
        )
        .unwrap();
        let update: MemberModel =
            serde_json::from_str(r#"{"user": {"id": "7", "username": "nelly"}, "nick": "nel"}"#)
                .unwrap();

        member.update(&update);
        assert_eq!(member.role_ids(), &[Snowflake::new(1), Snowflake::new(2)]);

        let update: MemberModel = serde_json::from_str(r#"{"roles": []}"#).unwrap();
        member.update(&update);
        assert!(member.role_ids().is_empty());
        assert!(member.roles.is_present());
    }
}
