//! Gateway error types

use cord_common::ClientError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::protocol::CloseCode;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// WebSocket transport failure
    #[error("WebSocket error: {0}")]
    Transport(Box<tungstenite::Error>),

    /// Payload that could not be decoded
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The gateway closed the connection
    #[error("Connection closed with code {code}: {reason}")]
    Closed { code: u16, reason: String },

    /// The server broke the handshake or framing rules
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// No heartbeat ACK arrived before the next beat was due
    #[error("Heartbeat not acknowledged")]
    ZombieConnection,

    /// REST call made on behalf of the gateway failed
    #[error(transparent)]
    Rest(#[from] ClientError),

    /// The shard was shut down
    #[error("Shard shut down")]
    Shutdown,
}

impl GatewayError {
    pub fn protocol(msg: impl std::fmt::Display) -> Self {
        Self::Protocol(msg.to_string())
    }

    /// Known close code, if this error is a close
    pub fn close_code(&self) -> Option<CloseCode> {
        match self {
            Self::Closed { code, .. } => CloseCode::from_u16(*code),
            _ => None,
        }
    }

    /// Errors after which the shard must stop instead of reconnecting
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Closed { .. } => self.close_code().is_some_and(CloseCode::is_fatal),
            Self::Rest(err) => err.is_client_error(),
            Self::Shutdown => true,
            _ => false,
        }
    }
}

impl From<tungstenite::Error> for GatewayError {
    fn from(err: tungstenite::Error) -> Self {
        Self::Transport(Box::new(err))
    }
}

impl From<GatewayError> for ClientError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Rest(err) => err,
            other => ClientError::gateway(other),
        }
    }
}

pub type GatewayResult<T> = Result<T, GatewayError>;
