//! JSON models - plain data mirroring the platform's payloads
//!
//! Optional fields use [`Optional`](crate::Optional) so that a partial
//! payload can be merged into a known model without erasing fields it
//! did not carry.

/// Declare an integer-backed enum with an `Unknown` catch-all.
///
/// The platform adds new values without notice, so decoding must not fail
/// on a value this crate does not know yet.
macro_rules! int_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident: $repr:ty {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value not known to this version of the library
            Unknown($repr),
        }

        impl From<$repr> for $name {
            fn from(value: $repr) -> Self {
                match value {
                    $( $value => Self::$variant, )+
                    other => Self::Unknown(other),
                }
            }
        }

        impl From<$name> for $repr {
            fn from(value: $name) -> Self {
                match value {
                    $( $name::$variant => $value, )+
                    $name::Unknown(other) => other,
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serde::Serialize::serialize(&<$repr>::from(*self), serializer)
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                <$repr as serde::Deserialize>::deserialize(deserializer).map(Self::from)
            }
        }
    };
}

pub(crate) use int_enum;

mod application_command;
mod audit_log;
mod ban;
mod channel;
mod embed;
mod error;
mod gateway;
mod guild;
mod interaction;
mod member;
mod message;
mod request;
mod role;
mod stage_instance;
mod user;
mod voice_region;

pub use application_command::{
    ApplicationCommandModel, ApplicationCommandOptionChoiceModel, ApplicationCommandOptionModel,
    ApplicationCommandOptionType, ApplicationCommandType, ChoiceValue,
};
pub use audit_log::{
    AuditLogActionType, AuditLogChangeModel, AuditLogEntryInfoModel, AuditLogEntryModel,
    AuditLogModel,
};
pub use ban::BanModel;
pub use channel::{ChannelModel, ChannelType, OverwriteModel, OverwriteType};
pub use embed::{
    EmbedAuthorModel, EmbedFieldModel, EmbedFooterModel, EmbedImageModel, EmbedModel,
    EmbedProviderModel, EmbedThumbnailModel, EmbedVideoModel,
};
pub use error::{RateLimitModel, RestErrorModel};
pub use gateway::{GatewayBotModel, SessionStartLimitModel};
pub use guild::{GuildModel, UnavailableGuildModel};
pub use interaction::{InteractionModel, InteractionType};
pub use member::MemberModel;
pub use message::{
    AttachmentModel, EmojiModel, MessageFlags, MessageModel, MessageReferenceModel,
    PartialMessageModel, ReactionModel,
};
pub use request::{
    AllowedMentionsModel, CreateFollowupMessageModel, CreateMessageModel, ExecuteWebhookModel,
};
pub use role::RoleModel;
pub use stage_instance::{StageInstanceModel, StagePrivacyLevel};
pub use user::UserModel;
pub use voice_region::VoiceRegionModel;
