use cord_core::models::UserModel;
use cord_core::{Entity, Snowflake, User};

use super::{share, shared_handle, Shared};

/// User seen on the gateway
#[derive(Debug, Clone)]
pub struct CachedUser {
    id: Snowflake,
    model: Shared<UserModel>,
}

impl CachedUser {
    pub(crate) fn new(model: UserModel) -> Self {
        Self {
            id: model.id,
            model: share(model),
        }
    }
}

shared_handle!(CachedUser, UserModel);

impl Entity for CachedUser {
    fn id(&self) -> Snowflake {
        self.id
    }
}

impl User for CachedUser {
    fn name(&self) -> String {
        self.model.read().username.clone()
    }

    fn discriminator(&self) -> String {
        self.model.read().discriminator().to_string()
    }

    fn global_name(&self) -> Option<String> {
        self.model.read().global_name.as_deref_value().cloned()
    }

    fn avatar_hash(&self) -> Option<String> {
        self.model.read().avatar.as_deref_value().cloned()
    }

    fn is_bot(&self) -> bool {
        self.model.read().bot.get_or(false)
    }
}
