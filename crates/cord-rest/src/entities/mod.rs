//! REST entities - a model plus a client handle for follow-up requests

mod channel;
mod guild;
mod member;
mod message;
mod stage_instance;
mod user;

pub use channel::{RestChannel, RestGroupDmChannel, RestGuildChannel, RestPrivateChannel};
pub use guild::RestGuild;
pub use member::RestMember;
pub use message::RestMessage;
pub use stage_instance::RestStageInstance;
pub use user::RestUser;
