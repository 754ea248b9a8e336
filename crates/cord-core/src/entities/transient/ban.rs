use super::TransientUser;
use crate::entities::Ban;
use crate::models::BanModel;
use crate::value_objects::Snowflake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientBan {
    guild_id: Snowflake,
    model: BanModel,
}

impl TransientBan {
    #[must_use]
    pub fn new(guild_id: Snowflake, model: BanModel) -> Self {
        Self { guild_id, model }
    }

    pub fn user(&self) -> TransientUser {
        TransientUser::new(self.model.user.clone())
    }
}

impl Ban for TransientBan {
    fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    fn user_id(&self) -> Snowflake {
        self.model.user.id
    }

    fn reason(&self) -> Option<String> {
        self.model.reason.clone()
    }
}
