//! Transient entities - built fresh from one payload, no identity beyond it

mod audit_log;
mod ban;
mod embed;
mod message;
mod role;
mod user;
mod voice_region;

pub use audit_log::TransientAuditLog;
pub use ban::TransientBan;
pub use embed::Embed;
pub use message::TransientMessage;
pub use role::TransientRole;
pub use user::TransientUser;
pub use voice_region::TransientVoiceRegion;
