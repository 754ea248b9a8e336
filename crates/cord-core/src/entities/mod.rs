//! Entities - behaviour-carrying wrappers around models
//!
//! The traits here are implemented by the transient entities below, by the
//! REST entities in `cord-rest`, and by the cached entities in `cord-cache`.

mod traits;
pub mod transient;

pub use traits::{
    AuditLog, Ban, Channel, Entity, GroupDmChannel, Guild, GuildChannel, Member, Message,
    PrivateChannel, Role, User, VoiceRegion,
};
pub use transient::{
    Embed, TransientAuditLog, TransientBan, TransientMessage, TransientRole, TransientUser,
    TransientVoiceRegion,
};
