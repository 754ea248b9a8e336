//! Optional field - distinguishes an absent JSON field from a present one
//!
//! Combine with `Option<T>` to model nullable fields: `Optional<Option<T>>`
//! is absent, present-null, or present with a value.
//!
//! Model fields use:
//!
//! ```ignore
//! #[serde(default, skip_serializing_if = "Optional::is_absent")]
//! pub topic: Optional<Option<String>>,
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use validator::{ValidateLength, ValidateRange};

/// A JSON field that may be missing from the payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Optional<T> {
    /// The field was not sent
    #[default]
    Absent,
    /// The field was sent with this value
    Present(T),
}

impl<T> Optional<T> {
    #[inline]
    pub const fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    #[inline]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// Borrow the value if present
    #[inline]
    pub const fn as_ref(&self) -> Optional<&T> {
        match self {
            Self::Present(value) => Optional::Present(value),
            Self::Absent => Optional::Absent,
        }
    }

    /// Borrow the value if present
    #[inline]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }

    /// `Some` becomes present, `None` absent
    #[inline]
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Present(value),
            None => Self::Absent,
        }
    }

    #[inline]
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Optional<U> {
        match self {
            Self::Present(value) => Optional::Present(f(value)),
            Self::Absent => Optional::Absent,
        }
    }

    /// Keep `self` if present, otherwise fall back to `other`
    pub fn or(self, other: Self) -> Self {
        match self {
            Self::Present(_) => self,
            Self::Absent => other,
        }
    }

    pub fn get_or(self, default: T) -> T {
        self.into_option().unwrap_or(default)
    }

    /// Copy `update` into `self` only when it is present.
    ///
    /// Absent values never overwrite known ones.
    pub fn update_from(&mut self, update: &Self)
    where
        T: Clone,
    {
        if let Self::Present(value) = update {
            *self = Self::Present(value.clone());
        }
    }
}

impl<T> Optional<Option<T>> {
    /// Flatten absent and null into `None`
    pub fn flatten(self) -> Option<T> {
        self.into_option().flatten()
    }

    /// Borrow through absent and null
    pub fn as_deref_value(&self) -> Option<&T> {
        self.value().and_then(Option::as_ref)
    }
}

impl<T> From<T> for Optional<T> {
    fn from(value: T) -> Self {
        Self::Present(value)
    }
}

impl<T> From<Optional<T>> for Option<T> {
    fn from(value: Optional<T>) -> Self {
        value.into_option()
    }
}

impl<T: Serialize> Serialize for Optional<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Present(value) => value.serialize(serializer),
            // Only reached when a field forgets `skip_serializing_if`
            Self::Absent => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Optional<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Only called when the field exists; `#[serde(default)]` covers absence
        T::deserialize(deserializer).map(Self::Present)
    }
}

// Absent values pass every check, like `None` does

impl<T: ValidateLength<u64>> ValidateLength<u64> for Optional<T> {
    fn length(&self) -> Option<u64> {
        self.value().and_then(|value| value.length())
    }
}

impl<T, V: ValidateRange<T>> ValidateRange<T> for Optional<V> {
    fn greater_than(&self, max: T) -> Option<bool> {
        self.value().and_then(|value| value.greater_than(max))
    }

    fn less_than(&self, min: T) -> Option<bool> {
        self.value().and_then(|value| value.less_than(min))
    }
}
