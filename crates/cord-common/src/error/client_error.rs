//! Client error types
//!
//! Unified error handling for REST and gateway operations.

use std::fmt;
use std::time::Duration;

use cord_core::ArgumentError;

use crate::config::ConfigError;

/// Client-wide error type
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The API answered with a non-success status that is not retried
    #[error("HTTP {status}: {message} (code {code})")]
    Http {
        status: u16,
        /// Platform JSON error code, 0 when the body had none
        code: u32,
        message: String,
        /// Flattened per-field validation messages
        errors: Vec<String>,
    },

    /// Rate limited and out of retries
    #[error("Rate limited on {bucket}; retry after {retry_after:?}")]
    RateLimited {
        bucket: String,
        retry_after: Duration,
        global: bool,
    },

    // Transport errors
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    // Gateway errors
    #[error("Gateway error: {0}")]
    Gateway(String),

    // Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    // Caller input errors
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    // Internal errors
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl ClientError {
    /// HTTP status carried by the error, if it came from a response
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::RateLimited { .. } => Some(429),
            _ => None,
        }
    }

    /// Short machine-readable code
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Http { status, .. } => match status {
                400 => "BAD_REQUEST",
                401 => "UNAUTHORIZED",
                403 => "FORBIDDEN",
                404 => "NOT_FOUND",
                405 => "METHOD_NOT_ALLOWED",
                500..=599 => "SERVER_ERROR",
                _ => "HTTP_ERROR",
            },
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::Transport(_) => "TRANSPORT_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Decode(_) => "DECODE_ERROR",
            Self::Gateway(_) => "GATEWAY_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Argument(e) => e.code(),
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a client error (4xx)
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        self.status_code()
            .is_some_and(|status| (400..500).contains(&status))
    }

    /// Check if this is a server error (5xx)
    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code()
            .is_some_and(|status| (500..600).contains(&status))
    }

    /// Whether repeating the same request may succeed
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Transport(_) | Self::Timeout => true,
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// Create a transport error from any displayable failure
    #[must_use]
    pub fn transport(err: impl fmt::Display) -> Self {
        Self::Transport(err.to_string())
    }

    /// Create a gateway error
    #[must_use]
    pub fn gateway(msg: impl fmt::Display) -> Self {
        Self::Gateway(msg.to_string())
    }

    /// Create an internal error from any error
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

/// Result type alias using ClientError
pub type ClientResult<T> = Result<T, ClientError>;
