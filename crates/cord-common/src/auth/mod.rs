//! Authentication

mod token;

pub use token::{Token, TokenType};
