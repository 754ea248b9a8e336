use cord_core::models::RoleModel;
use cord_core::{Color, Entity, Permissions, Role, Snowflake};

use super::{share, shared_handle, Shared};

#[derive(Debug, Clone)]
pub struct CachedRole {
    guild_id: Snowflake,
    id: Snowflake,
    model: Shared<RoleModel>,
}

impl CachedRole {
    pub(crate) fn new(guild_id: Snowflake, model: RoleModel) -> Self {
        Self {
            guild_id,
            id: model.id,
            model: share(model),
        }
    }

    /// The `@everyone` role shares its id with the guild
    pub fn is_everyone(&self) -> bool {
        self.id == self.guild_id
    }
}

shared_handle!(CachedRole, RoleModel);

impl Entity for CachedRole {
    fn id(&self) -> Snowflake {
        self.id
    }
}

impl Role for CachedRole {
    fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    fn name(&self) -> String {
        self.model.read().name.clone()
    }

    fn color(&self) -> Color {
        self.model.read().color
    }

    fn permissions(&self) -> Permissions {
        self.model.read().permissions
    }

    fn position(&self) -> i32 {
        self.model.read().position
    }

    fn is_hoisted(&self) -> bool {
        self.model.read().hoist
    }

    fn is_mentionable(&self) -> bool {
        self.model.read().mentionable
    }
}
