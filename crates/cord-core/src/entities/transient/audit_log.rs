use super::TransientUser;
use crate::entities::{AuditLog, Entity};
use crate::models::{AuditLogActionType, AuditLogChangeModel, AuditLogEntryModel, UserModel};
use crate::value_objects::Snowflake;

/// One audit log entry, with the acting user resolved from the page it came in
#[derive(Debug, Clone, PartialEq)]
pub struct TransientAuditLog {
    guild_id: Snowflake,
    model: AuditLogEntryModel,
    actor: Option<UserModel>,
}

impl TransientAuditLog {
    #[must_use]
    pub fn new(guild_id: Snowflake, model: AuditLogEntryModel, actor: Option<UserModel>) -> Self {
        Self {
            guild_id,
            model,
            actor,
        }
    }

    pub fn actor(&self) -> Option<TransientUser> {
        self.actor.clone().map(TransientUser::new)
    }

    pub fn model(&self) -> &AuditLogEntryModel {
        &self.model
    }
}

impl Entity for TransientAuditLog {
    fn id(&self) -> Snowflake {
        self.model.id
    }
}

impl AuditLog for TransientAuditLog {
    fn guild_id(&self) -> Snowflake {
        self.guild_id
    }

    fn actor_id(&self) -> Option<Snowflake> {
        self.model.user_id
    }

    fn target_id(&self) -> Option<Snowflake> {
        self.model.target_snowflake()
    }

    fn action_type(&self) -> AuditLogActionType {
        self.model.action_type
    }

    fn reason(&self) -> Option<String> {
        self.model.reason.value().cloned()
    }

    fn changes(&self) -> Vec<AuditLogChangeModel> {
        self.model.changes.value().cloned().unwrap_or_default()
    }
}
