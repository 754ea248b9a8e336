//! Entity traits shared by transient, REST and cached entities
//!
//! Accessors return owned values: cached entities read through a lock and
//! cannot hand out borrows.

use chrono::{DateTime, Utc};

use crate::models::{
    AuditLogActionType, AuditLogChangeModel, ChannelType, OverwriteModel,
};
use crate::value_objects::{Color, Permissions, Snowflake};

/// Anything identified by a snowflake
pub trait Entity {
    fn id(&self) -> Snowflake;

    /// Creation time encoded in the id
    fn created_at(&self) -> DateTime<Utc> {
        self.id().created_at()
    }
}

pub trait User: Entity {
    fn name(&self) -> String;

    fn discriminator(&self) -> String;

    fn global_name(&self) -> Option<String>;

    fn avatar_hash(&self) -> Option<String>;

    fn is_bot(&self) -> bool;

    /// Global name when set, else the username
    fn display_name(&self) -> String {
        self.global_name().unwrap_or_else(|| self.name())
    }

    fn mention(&self) -> String {
        format!("<@{}>", self.id())
    }
}

pub trait Channel: Entity {
    fn kind(&self) -> ChannelType;

    fn name(&self) -> Option<String>;

    fn mention(&self) -> String {
        format!("<#{}>", self.id())
    }
}

/// DM or group DM
pub trait PrivateChannel: Channel {
    fn last_message_id(&self) -> Option<Snowflake>;
}

pub trait GroupDmChannel: PrivateChannel {
    fn icon_hash(&self) -> Option<String>;

    fn owner_id(&self) -> Option<Snowflake>;

    fn recipient_ids(&self) -> Vec<Snowflake>;
}

pub trait GuildChannel: Channel {
    fn guild_id(&self) -> Snowflake;

    fn position(&self) -> i32;

    /// Category the channel sits in
    fn parent_id(&self) -> Option<Snowflake>;

    fn overwrites(&self) -> Vec<OverwriteModel>;
}

pub trait Guild: Entity {
    fn name(&self) -> String;

    fn owner_id(&self) -> Option<Snowflake>;

    fn icon_hash(&self) -> Option<String>;

    fn is_unavailable(&self) -> bool;
}

pub trait Role: Entity {
    fn guild_id(&self) -> Snowflake;

    fn name(&self) -> String;

    fn color(&self) -> Color;

    fn permissions(&self) -> Permissions;

    fn position(&self) -> i32;

    fn is_hoisted(&self) -> bool;

    fn is_mentionable(&self) -> bool;

    fn mention(&self) -> String {
        format!("<@&{}>", self.id())
    }
}

/// A user within a guild
pub trait Member: User {
    fn guild_id(&self) -> Snowflake;

    fn nick(&self) -> Option<String>;

    fn role_ids(&self) -> Vec<Snowflake>;

    fn joined_at(&self) -> Option<DateTime<Utc>>;
}

pub trait Message: Entity {
    fn channel_id(&self) -> Snowflake;

    fn guild_id(&self) -> Option<Snowflake>;

    fn author_id(&self) -> Snowflake;

    fn content(&self) -> String;

    fn is_pinned(&self) -> bool;

    fn edited_at(&self) -> Option<DateTime<Utc>>;
}

/// Voice regions are identified by a string, not a snowflake
pub trait VoiceRegion {
    fn id(&self) -> String;

    fn name(&self) -> String;

    fn is_optimal(&self) -> bool;

    fn is_deprecated(&self) -> bool;
}

pub trait Ban {
    fn guild_id(&self) -> Snowflake;

    fn user_id(&self) -> Snowflake;

    fn reason(&self) -> Option<String>;
}

pub trait AuditLog: Entity {
    fn guild_id(&self) -> Snowflake;

    /// User who performed the action
    fn actor_id(&self) -> Option<Snowflake>;

    fn target_id(&self) -> Option<Snowflake>;

    fn action_type(&self) -> AuditLogActionType;

    fn reason(&self) -> Option<String>;

    fn changes(&self) -> Vec<AuditLogChangeModel>;
}
