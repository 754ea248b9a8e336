//! Slash command builders

use serde::Serialize;
use validator::{Validate, ValidationError};

use crate::error::ArgumentError;
use crate::models::{
    ApplicationCommandModel, ApplicationCommandOptionChoiceModel, ApplicationCommandOptionModel,
    ApplicationCommandOptionType, ApplicationCommandType, ChoiceValue,
};
use crate::value_objects::{Optional, Permissions};

pub const MAX_NAME_LENGTH: usize = 32;
pub const MAX_DESCRIPTION_LENGTH: usize = 100;
pub const MAX_OPTIONS: usize = 25;
pub const MAX_CHOICES: usize = 25;

fn lowercase_name(value: &str) -> Result<(), ValidationError> {
    if value.chars().any(|c| c.is_whitespace() || c.is_uppercase()) {
        return Err(ValidationError::new("lowercase"));
    }
    Ok(())
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn required(name: &'static str, value: Option<&str>) -> Result<String, ArgumentError> {
    value.map(str::to_string).ok_or(ArgumentError::Empty { name })
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct LocalSlashCommandOptionChoice {
    #[validate(length(min = 1, max = 100, message = "Choice names must be 1-100 characters"))]
    pub name: String,
    pub value: ChoiceValue,
}

impl LocalSlashCommandOptionChoice {
    pub fn new(name: impl Into<String>, value: impl Into<ChoiceValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One option (argument, subcommand or group) of a slash command
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct LocalSlashCommandOption {
    pub kind: ApplicationCommandOptionType,
    #[validate(
        length(min = 1, max = 32, message = "Command names must be 1-32 characters"),
        custom(function = "lowercase_name", message = "Command names must be lowercase with no whitespace")
    )]
    pub name: Option<String>,
    #[validate(
        length(min = 1, max = 100, message = "Descriptions must be 1-100 characters"),
        custom(function = "not_blank", message = "Descriptions must not be blank")
    )]
    pub description: Option<String>,
    pub is_required: bool,
    #[validate(length(max = 25, message = "Options can have at most 25 choices"), nested)]
    pub choices: Vec<LocalSlashCommandOptionChoice>,
    #[validate(length(max = 25, message = "Commands can have at most 25 options"), nested)]
    pub options: Vec<LocalSlashCommandOption>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub has_autocomplete: bool,
}

impl LocalSlashCommandOption {
    #[must_use]
    pub fn new(kind: ApplicationCommandOptionType) -> Self {
        Self {
            kind,
            name: None,
            description: None,
            is_required: false,
            choices: Vec::new(),
            options: Vec::new(),
            min_value: None,
            max_value: None,
            has_autocomplete: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_is_required(mut self, is_required: bool) -> Self {
        self.is_required = is_required;
        self
    }

    pub fn add_choice(mut self, choice: LocalSlashCommandOptionChoice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn add_option(mut self, option: LocalSlashCommandOption) -> Self {
        self.options.push(option);
        self
    }

    pub fn with_min_value(mut self, min_value: f64) -> Self {
        self.min_value = Some(min_value);
        self
    }

    pub fn with_max_value(mut self, max_value: f64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    pub fn with_has_autocomplete(mut self, has_autocomplete: bool) -> Self {
        self.has_autocomplete = has_autocomplete;
        self
    }

    pub fn to_model(&self) -> Result<ApplicationCommandOptionModel, ArgumentError> {
        let name = required("name", self.name.as_deref())?;
        let description = required("description", self.description.as_deref())?;
        self.validate()?;

        if !self.choices.is_empty() && !self.kind.supports_choices() {
            return Err(ArgumentError::Unsupported(format!(
                "option {name} of type {:?} cannot have choices",
                self.kind
            )));
        }
        if !self.options.is_empty() && !self.kind.is_container() {
            return Err(ArgumentError::Unsupported(format!(
                "option {name} of type {:?} cannot have nested options",
                self.kind
            )));
        }
        if self.has_autocomplete && !self.choices.is_empty() {
            return Err(ArgumentError::Unsupported(format!(
                "option {name} cannot have both choices and autocomplete"
            )));
        }

        let choices = self
            .choices
            .iter()
            .map(|choice| ApplicationCommandOptionChoiceModel {
                name: choice.name.clone(),
                value: choice.value.clone(),
            })
            .collect();

        let options = self
            .options
            .iter()
            .map(LocalSlashCommandOption::to_model)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ApplicationCommandOptionModel {
            kind: self.kind,
            name,
            description,
            required: if self.is_required {
                Optional::Present(true)
            } else {
                Optional::Absent
            },
            choices: non_empty(choices),
            options: non_empty(options),
            min_value: Optional::from_option(self.min_value),
            max_value: Optional::from_option(self.max_value),
            min_length: Optional::Absent,
            max_length: Optional::Absent,
            autocomplete: if self.has_autocomplete {
                Optional::Present(true)
            } else {
                Optional::Absent
            },
        })
    }
}

fn non_empty<T>(items: Vec<T>) -> Optional<Vec<T>> {
    if items.is_empty() {
        Optional::Absent
    } else {
        Optional::Present(items)
    }
}

/// Chat-input application command
#[derive(Debug, Clone, PartialEq, Default, Validate)]
pub struct LocalSlashCommand {
    #[validate(
        length(min = 1, max = 32, message = "Command names must be 1-32 characters"),
        custom(function = "lowercase_name", message = "Command names must be lowercase with no whitespace")
    )]
    pub name: Option<String>,
    #[validate(
        length(min = 1, max = 100, message = "Descriptions must be 1-100 characters"),
        custom(function = "not_blank", message = "Descriptions must not be blank")
    )]
    pub description: Option<String>,
    #[validate(length(max = 25, message = "Commands can have at most 25 options"), nested)]
    pub options: Vec<LocalSlashCommandOption>,
    pub default_member_permissions: Option<Permissions>,
    pub is_enabled_in_dms: Option<bool>,
    pub is_nsfw: Option<bool>,
}

impl LocalSlashCommand {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append one option
    pub fn add_option(mut self, option: LocalSlashCommandOption) -> Self {
        self.options.push(option);
        self
    }

    /// Replace all options
    pub fn with_options<I>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = LocalSlashCommandOption>,
    {
        self.options = options.into_iter().collect();
        self
    }

    pub fn with_default_member_permissions(mut self, permissions: Permissions) -> Self {
        self.default_member_permissions = Some(permissions);
        self
    }

    pub fn with_is_enabled_in_dms(mut self, is_enabled: bool) -> Self {
        self.is_enabled_in_dms = Some(is_enabled);
        self
    }

    pub fn with_is_nsfw(mut self, is_nsfw: bool) -> Self {
        self.is_nsfw = Some(is_nsfw);
        self
    }

    pub fn to_model(&self) -> Result<ApplicationCommandModel, ArgumentError> {
        let name = required("name", self.name.as_deref())?;
        let description = required("description", self.description.as_deref())?;
        self.validate()?;

        let options = self
            .options
            .iter()
            .map(LocalSlashCommandOption::to_model)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ApplicationCommandModel {
            id: Optional::Absent,
            kind: Optional::Present(ApplicationCommandType::ChatInput),
            application_id: Optional::Absent,
            guild_id: Optional::Absent,
            name,
            description,
            options: non_empty(options),
            default_member_permissions: self
                .default_member_permissions
                .map_or(Optional::Absent, |p| Optional::Present(Some(p))),
            dm_permission: Optional::from_option(self.is_enabled_in_dms),
            nsfw: Optional::from_option(self.is_nsfw),
            version: Optional::Absent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn animal_option() -> LocalSlashCommandOption {
        LocalSlashCommandOption::new(ApplicationCommandOptionType::String)
            .with_name("animal")
            .with_description("The type of animal")
            .with_is_required(true)
            .add_choice(LocalSlashCommandOptionChoice::new("Dog", "animal_dog"))
    }

    #[test]
    fn test_to_model() {
        let command = LocalSlashCommand::new()
            .with_name("blep")
            .with_description("Send a random adorable animal photo")
            .add_option(animal_option());

        let model = command.to_model().unwrap();

        assert_eq!(model.name, "blep");
        assert_eq!(model.kind, Optional::Present(ApplicationCommandType::ChatInput));
        let options = model.options.value().unwrap();
        assert_eq!(options[0].required, Optional::Present(true));
        assert_eq!(options[0].choices.value().map(Vec::len), Some(1));
    }

    #[test]
    fn test_with_options_replaces() {
        let command = LocalSlashCommand::new()
            .add_option(animal_option())
            .add_option(animal_option())
            .with_options([animal_option()]);
        assert_eq!(command.options.len(), 1);
    }

    #[test]
    fn test_missing_description() {
        let command = LocalSlashCommand::new().with_name("blep");
        assert_eq!(
            command.to_model(),
            Err(ArgumentError::Empty {
                name: "description"
            })
        );
    }

    #[test]
    fn test_uppercase_name_rejected() {
        let command = LocalSlashCommand::new()
            .with_name("Blep")
            .with_description("d");
        assert_eq!(
            command.to_model(),
            Err(ArgumentError::Validation(
                "name: Command names must be lowercase with no whitespace".to_string()
            ))
        );
    }

    #[test]
    fn test_name_length_limit() {
        let command = LocalSlashCommand::new()
            .with_name("x".repeat(33))
            .with_description("d");
        assert_eq!(
            command.to_model(),
            Err(ArgumentError::Validation(
                "name: Command names must be 1-32 characters".to_string()
            ))
        );
    }

    #[test]
    fn test_blank_description_rejected() {
        let command = LocalSlashCommand::new().with_name("blep").with_description("   ");
        assert_eq!(
            command.to_model(),
            Err(ArgumentError::Validation(
                "description: Descriptions must not be blank".to_string()
            ))
        );
    }

    #[test]
    fn test_option_count_limit() {
        let command = LocalSlashCommand::new()
            .with_name("blep")
            .with_description("d")
            .with_options((0..26).map(|_| animal_option()));
        assert_eq!(
            command.to_model(),
            Err(ArgumentError::Validation(
                "options: Commands can have at most 25 options".to_string()
            ))
        );
    }

    #[test]
    fn test_nested_choice_name_checked() {
        let option = LocalSlashCommandOption::new(ApplicationCommandOptionType::String)
            .with_name("animal")
            .with_description("d")
            .add_choice(LocalSlashCommandOptionChoice::new("", "empty"));
        assert!(matches!(option.to_model(), Err(ArgumentError::Validation(_))));

        let command = LocalSlashCommand::new()
            .with_name("blep")
            .with_description("d")
            .add_option(option);
        assert!(matches!(command.to_model(), Err(ArgumentError::Validation(_))));
    }

    #[test]
    fn test_choices_on_boolean_rejected() {
        let option = LocalSlashCommandOption::new(ApplicationCommandOptionType::Boolean)
            .with_name("flag")
            .with_description("d")
            .add_choice(LocalSlashCommandOptionChoice::new("yes", 1_i64));
        assert!(matches!(option.to_model(), Err(ArgumentError::Unsupported(_))));
    }

    #[test]
    fn test_subcommand_nesting() {
        let sub = LocalSlashCommandOption::new(ApplicationCommandOptionType::SubCommand)
            .with_name("dog")
            .with_description("Dogs")
            .add_option(animal_option());
        let model = sub.to_model().unwrap();
        assert_eq!(model.options.value().map(Vec::len), Some(1));
    }
}
