//! Cached entities
//!
//! Each entity is a cheap handle around an `Arc<RwLock<Model>>` owned by the
//! cache. Cloning a handle never copies the model; accessors read through the
//! lock, so they always reflect the latest gateway state.

mod channel;
mod guild;
mod member;
mod message;
mod role;
mod user;

use std::sync::Arc;

use parking_lot::RwLock;

pub use channel::{CachedChannel, CachedGuildChannel, CachedPrivateChannel};
pub use guild::CachedGuild;
pub use member::CachedMember;
pub use message::CachedMessage;
pub use role::CachedRole;
pub use user::CachedUser;

/// Model shared between the cache and every handle to it
pub type Shared<M> = Arc<RwLock<M>>;

/// Wrap a model for sharing
pub(crate) fn share<M>(model: M) -> Shared<M> {
    Arc::new(RwLock::new(model))
}

/// Read, clone-and-replace and pointer equality for cached handles
macro_rules! shared_handle {
    ($entity:ident, $model:ty) => {
        impl $entity {
            /// Lock the model for reading
            pub fn read(&self) -> parking_lot::RwLockReadGuard<'_, $model> {
                self.model.read()
            }

            /// Owned copy of the current state
            pub fn snapshot(&self) -> $model {
                self.model.read().clone()
            }

            /// `true` when both handles point at the same cache entry
            pub fn ptr_eq(&self, other: &Self) -> bool {
                std::sync::Arc::ptr_eq(&self.model, &other.model)
            }

            /// Mutate in place and return the state from before the change
            pub(crate) fn replace_with(&self, apply: impl FnOnce(&mut $model)) -> $model {
                let mut model = self.model.write();
                let old = model.clone();
                apply(&mut model);
                old
            }
        }
    };
}

pub(crate) use shared_handle;
