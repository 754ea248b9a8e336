use cord_core::models::GuildModel;
use cord_core::{Entity, Guild, Optional, Snowflake};

use super::{share, shared_handle, Shared};

/// Guild-level state
///
/// Roles, members and channels live in their own collections; the stored
/// model keeps none of them.
#[derive(Debug, Clone)]
pub struct CachedGuild {
    id: Snowflake,
    model: Shared<GuildModel>,
}

impl CachedGuild {
    pub(crate) fn new(mut model: GuildModel) -> Self {
        strip_nested(&mut model);
        Self {
            id: model.id,
            model: share(model),
        }
    }

    pub fn member_count(&self) -> Option<u32> {
        self.model.read().member_count.value().copied()
    }

    pub fn features(&self) -> Vec<String> {
        self.model.read().features.clone()
    }

    pub(crate) fn set_unavailable(&self, unavailable: bool) {
        self.model.write().unavailable = Optional::Present(unavailable);
    }
}

shared_handle!(CachedGuild, GuildModel);

/// Drop the collections that are cached separately
pub(crate) fn strip_nested(model: &mut GuildModel) {
    model.roles.clear();
    model.members = Optional::Absent;
    model.channels = Optional::Absent;
    model.threads = Optional::Absent;
}

impl Entity for CachedGuild {
    fn id(&self) -> Snowflake {
        self.id
    }
}

impl Guild for CachedGuild {
    fn name(&self) -> String {
        self.model.read().name.clone()
    }

    fn owner_id(&self) -> Option<Snowflake> {
        self.model.read().owner_id.value().copied()
    }

    fn icon_hash(&self) -> Option<String> {
        self.model.read().icon.as_deref_value().cloned()
    }

    fn is_unavailable(&self) -> bool {
        self.model.read().unavailable.get_or(false)
    }
}
