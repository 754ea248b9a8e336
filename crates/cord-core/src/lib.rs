//! # cord-core
//!
//! Data layer of the client: value objects, JSON models, entity traits,
//! transient entities and local builders.
//! This crate performs no I/O; the REST and gateway crates build on it.

pub mod entities;
pub mod error;
pub mod guard;
pub mod local;
pub mod models;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    AuditLog, Ban, Channel, Embed, Entity, GroupDmChannel, Guild, GuildChannel, Member, Message,
    PrivateChannel, Role, TransientAuditLog, TransientBan, TransientMessage, TransientRole,
    TransientUser, TransientVoiceRegion, User, VoiceRegion,
};
pub use error::ArgumentError;
pub use local::{
    LocalEmbed, LocalInteractionFollowup, LocalMessage, LocalSlashCommand,
    LocalSlashCommandOption, LocalSlashCommandOptionChoice,
};
pub use value_objects::{Color, Optional, Permissions, Snowflake, SnowflakeParseError};
