use crate::entities::{Entity, Role};
use crate::models::RoleModel;
use crate::value_objects::{Color, Permissions, Snowflake};

/// Role from a REST response; the payload does not name its guild
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransientRole {
    guild_id: Snowflake,
    model: RoleModel,
}

impl TransientRole {
    #[must_use]
    pub fn new(guild_id: Snowflake, model: RoleModel) -> Self {
        Self { guild_id, model }
    }

    pub fn model(&self) -> &RoleModel {
        &self.model
    }
}

impl Entity for TransientRole {
    fn id(&self) -> Snowflake {
        self.model.id
    }
}

impl Role for TransientRole {
    fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    fn name(&self) -> String {
        self.model.name.clone()
    }

    fn color(&self) -> Color {
        self.model.color
    }

    fn permissions(&self) -> Permissions {
        self.model.permissions
    }

    fn position(&self) -> i32 {
        self.model.position
    }

    fn is_hoisted(&self) -> bool {
        self.model.hoist
    }

    fn is_mentionable(&self) -> bool {
        self.model.mentionable
    }
}
