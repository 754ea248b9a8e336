//! Guard checks for caller-supplied arguments

use crate::error::ArgumentError;

/// Fail when the string is empty or whitespace only
pub fn not_blank(name: &'static str, value: &str) -> Result<(), ArgumentError> {
    if value.trim().is_empty() {
        return Err(ArgumentError::Empty { name });
    }
    Ok(())
}

/// Fail when the value is outside `min..=max`
pub fn in_range<T>(name: &'static str, value: T, min: T, max: T) -> Result<(), ArgumentError>
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        return Err(ArgumentError::out_of_range(
            name,
            format!("{value} is not between {min} and {max}"),
        ));
    }
    Ok(())
}
