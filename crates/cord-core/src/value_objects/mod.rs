//! Value objects - immutable types that represent platform concepts

mod color;
mod optional;
mod permissions;
mod snowflake;

pub use color::Color;
pub use optional::Optional;
pub use permissions::Permissions;
pub use snowflake::{Snowflake, SnowflakeParseError};
