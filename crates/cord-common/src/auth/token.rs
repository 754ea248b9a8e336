//! Authorization token sent with every REST request and gateway identify

use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use base64::Engine;
use cord_core::{ArgumentError, Snowflake};
use std::fmt;

/// Token type enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    Bot,
    Bearer,
}

impl TokenType {
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Bot => "Bot",
            Self::Bearer => "Bearer",
        }
    }
}

/// A secret token; never printed in full
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenType,
    secret: String,
}

impl Token {
    /// Create a bot token
    ///
    /// # Errors
    /// Returns an error if the token is blank
    pub fn bot(secret: impl Into<String>) -> Result<Self, ArgumentError> {
        Self::new(TokenType::Bot, secret)
    }

    /// Create a bearer token
    pub fn bearer(secret: impl Into<String>) -> Result<Self, ArgumentError> {
        Self::new(TokenType::Bearer, secret)
    }

    fn new(kind: TokenType, secret: impl Into<String>) -> Result<Self, ArgumentError> {
        let secret = secret.into();
        let secret = secret
            .strip_prefix("Bot ")
            .or_else(|| secret.strip_prefix("Bearer "))
            .unwrap_or(&secret)
            .trim()
            .to_string();
        cord_core::guard::not_blank("token", &secret)?;
        Ok(Self { kind, secret })
    }

    #[must_use]
    pub fn kind(&self) -> TokenType {
        self.kind
    }

    /// Raw token, as sent in the gateway identify payload
    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Value of the `Authorization` header
    #[must_use]
    pub fn authorization(&self) -> String {
        format!("{} {}", self.kind.prefix(), self.secret)
    }

    /// Id of the bot, decoded from the first token segment
    ///
    /// Returns `None` for bearer tokens and malformed bot tokens.
    #[must_use]
    pub fn bot_id(&self) -> Option<Snowflake> {
        if self.kind != TokenType::Bot {
            return None;
        }
        let segment = self.secret.split('.').next()?.trim_end_matches('=');
        let bytes = URL_SAFE_NO_PAD
            .decode(segment)
            .or_else(|_| STANDARD_NO_PAD.decode(segment))
            .ok()?;
        String::from_utf8(bytes).ok()?.parse().ok()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("kind", &self.kind)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_header() {
        let token = Token::bot("abc.def.ghi").unwrap();
        assert_eq!(token.authorization(), "Bot abc.def.ghi");
        assert_eq!(token.secret(), "abc.def.ghi");
    }

    #[test]
    fn test_prefix_stripped() {
        let token = Token::bot("Bot abc").unwrap();
        assert_eq!(token.authorization(), "Bot abc");
    }

    #[test]
    fn test_blank_rejected() {
        assert!(Token::bot("   ").is_err());
    }

    #[test]
    fn test_bot_id() {
        // "175928847299117063" encoded without padding
        let token = Token::bot("MTc1OTI4ODQ3Mjk5MTE3MDYz.G1234.secret").unwrap();
        assert_eq!(token.bot_id(), Some(Snowflake::new(175_928_847_299_117_063)));
        assert_eq!(Token::bearer("x").unwrap().bot_id(), None);
    }

    #[test]
    fn test_debug_redacts() {
        let token = Token::bot("super-secret").unwrap();
        assert!(!format!("{token:?}").contains("super-secret"));
    }
}
