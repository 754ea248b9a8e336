use crate::entities::{Entity, User};
use crate::models::UserModel;
use crate::value_objects::Snowflake;

/// User built from a single REST response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientUser {
    model: UserModel,
}

impl TransientUser {
    #[must_use]
    pub fn new(model: UserModel) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &UserModel {
        &self.model
    }

    pub fn into_model(self) -> UserModel {
        self.model
    }
}

impl Entity for TransientUser {
    fn id(&self) -> Snowflake {
        self.model.id
    }
}

impl User for TransientUser {
    fn name(&self) -> String {
        self.model.username.clone()
    }

    fn discriminator(&self) -> String {
        self.model.discriminator().to_string()
    }

    fn global_name(&self) -> Option<String> {
        self.model.global_name.as_deref_value().cloned()
    }

    fn avatar_hash(&self) -> Option<String> {
        self.model.avatar.as_deref_value().cloned()
    }

    fn is_bot(&self) -> bool {
        self.model.bot.get_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_user() {
        let model: UserModel = serde_json::from_str(
            r#"{"id": "175928847299117063", "username": "nelly", "global_name": "Nelly", "bot": true}"#,
        )
        .unwrap();
        let user = TransientUser::new(model);

        assert_eq!(user.display_name(), "Nelly");
        assert_eq!(user.mention(), "<@175928847299117063>");
        assert!(user.is_bot());
        assert_eq!(user.created_at().timestamp_millis(), 1_462_015_105_796);
    }
}
