//! Local builders - values composed client-side and sent in requests
//!
//! Every builder validates itself in `to_model()` and reports the first
//! violated platform limit as an [`ArgumentError`](crate::ArgumentError).

mod embed;
mod message;
mod slash_command;

pub use embed::{
    LocalEmbed, LocalEmbedAuthor, LocalEmbedField, LocalEmbedFooter, MAX_EMBED_TOTAL_LENGTH,
};
pub use message::{LocalInteractionFollowup, LocalMessage, MAX_CONTENT_LENGTH, MAX_EMBEDS};
pub use slash_command::{
    LocalSlashCommand, LocalSlashCommandOption, LocalSlashCommandOptionChoice,
};
