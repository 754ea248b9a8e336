//! Argument errors - failures of guard checks on caller input

use thiserror::Error;

/// Raised when a value passed into the library violates a platform constraint
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("{name} must not be empty")]
    Empty { name: &'static str },

    #[error("{name} must be at most {max} characters long (was {actual})")]
    TooLong {
        name: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("{name} is out of range: {message}")]
    OutOfRange {
        name: &'static str,
        message: String,
    },

    #[error("{name} is invalid: {message}")]
    Invalid {
        name: &'static str,
        message: String,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0}")]
    Unsupported(String),
}

impl ArgumentError {
    /// Name of the offending argument, if one is known
    pub fn argument(&self) -> Option<&'static str> {
        match self {
            Self::Empty { name }
            | Self::TooLong { name, .. }
            | Self::OutOfRange { name, .. }
            | Self::Invalid { name, .. } => Some(*name),
            Self::Validation(_) | Self::Unsupported(_) => None,
        }
    }

    /// Short machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::Empty { .. } => "ARGUMENT_EMPTY",
            Self::TooLong { .. } => "ARGUMENT_TOO_LONG",
            Self::OutOfRange { .. } => "ARGUMENT_OUT_OF_RANGE",
            Self::Invalid { .. } => "ARGUMENT_INVALID",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unsupported(_) => "ARGUMENT_UNSUPPORTED",
        }
    }

    pub(crate) fn out_of_range(name: &'static str, message: impl Into<String>) -> Self {
        Self::OutOfRange {
            name,
            message: message.into(),
        }
    }
}

impl From<validator::ValidationErrors> for ArgumentError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{field}: {message}"),
                    None => format!("{field}: {}", e.code),
                })
            })
            .next()
            .unwrap_or_else(|| errors.to_string());
        Self::Validation(message)
    }
}
