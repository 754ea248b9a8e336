//! Client configuration
//!
//! Loads configuration from environment variables, an optional `.env` file
//! and an optional `cord.toml`.

use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main client configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Bot token, without the `Bot ` prefix
    pub token: String,
    #[serde(default)]
    pub env: Environment,
    #[serde(default)]
    pub rest: RestConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            other => Err(format!("unknown environment '{other}'")),
        }
    }
}

/// REST client settings
#[derive(Debug, Clone, Deserialize)]
pub struct RestConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_api_version")]
    pub api_version: u8,
    /// Retries after a 429, 5xx or transport failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Process-wide requests per second
    #[serde(default = "default_global_rate_limit")]
    pub global_rate_limit: u32,
}

impl RestConfig {
    /// Versioned base URL, e.g. `https://discord.com/api/v10`
    #[must_use]
    pub fn base_url(&self) -> String {
        format!(
            "{}/v{}",
            self.api_url.trim_end_matches('/'),
            self.api_version
        )
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_version: default_api_version(),
            max_retries: default_max_retries(),
            request_timeout_secs: default_request_timeout_secs(),
            global_rate_limit: default_global_rate_limit(),
        }
    }
}

/// Gateway connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_url")]
    pub url: String,
    #[serde(default = "default_api_version")]
    pub version: u8,
    /// Raw intents bitfield
    #[serde(default = "default_intents")]
    pub intents: u64,
    #[serde(default)]
    pub shard_id: u32,
    #[serde(default = "default_shard_count")]
    pub shard_count: u32,
}

impl GatewayConfig {
    /// URL to open the WebSocket against
    #[must_use]
    pub fn connect_url(&self) -> String {
        format!(
            "{}/?v={}&encoding=json",
            self.url.trim_end_matches('/'),
            self.version
        )
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            version: default_api_version(),
            intents: default_intents(),
            shard_id: 0,
            shard_count: default_shard_count(),
        }
    }
}

/// Gateway cache settings
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Messages kept per channel; 0 disables message caching
    #[serde(default = "default_message_cache_size")]
    pub message_cache_size: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            message_cache_size: default_message_cache_size(),
        }
    }
}

// Default value functions
fn default_api_url() -> String {
    "https://discord.com/api".to_string()
}

fn default_api_version() -> u8 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_global_rate_limit() -> u32 {
    50
}

fn default_gateway_url() -> String {
    "wss://gateway.discord.gg".to_string()
}

fn default_intents() -> u64 {
    // GUILDS | GUILD_MESSAGES | DIRECT_MESSAGES
    (1 << 0) | (1 << 9) | (1 << 12)
}

fn default_shard_count() -> u32 {
    1
}

fn default_message_cache_size() -> usize {
    100
}

/// Parse an optional variable, failing on values that are present but malformed
fn parse_var<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        None => Ok(None),
    }
}

impl ClientConfig {
    /// Create a configuration with defaults for everything but the token
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            env: Environment::default(),
            rest: RestConfig::default(),
            gateway: GatewayConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if `CORD_TOKEN` is missing or a value cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from any variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = lookup("CORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::MissingVar("CORD_TOKEN"))?;

        Self {
            token,
            env: parse_var(&lookup, "CORD_ENV")?.unwrap_or_default(),
            rest: RestConfig {
                api_url: lookup("CORD_API_URL").unwrap_or_else(default_api_url),
                api_version: parse_var(&lookup, "CORD_API_VERSION")?
                    .unwrap_or_else(default_api_version),
                max_retries: parse_var(&lookup, "CORD_MAX_RETRIES")?
                    .unwrap_or_else(default_max_retries),
                request_timeout_secs: parse_var(&lookup, "CORD_REQUEST_TIMEOUT_SECS")?
                    .unwrap_or_else(default_request_timeout_secs),
                global_rate_limit: parse_var(&lookup, "CORD_GLOBAL_RATE_LIMIT")?
                    .unwrap_or_else(default_global_rate_limit),
            },
            gateway: GatewayConfig {
                url: lookup("CORD_GATEWAY_URL").unwrap_or_else(default_gateway_url),
                version: parse_var(&lookup, "CORD_API_VERSION")?
                    .unwrap_or_else(default_api_version),
                intents: parse_var(&lookup, "CORD_INTENTS")?.unwrap_or_else(default_intents),
                shard_id: parse_var(&lookup, "CORD_SHARD_ID")?.unwrap_or(0),
                shard_count: parse_var(&lookup, "CORD_SHARD_COUNT")?
                    .unwrap_or_else(default_shard_count),
            },
            cache: CacheConfig {
                message_cache_size: parse_var(&lookup, "CORD_MESSAGE_CACHE_SIZE")?
                    .unwrap_or_else(default_message_cache_size),
            },
        }
        .validated()
    }

    /// Layered load: defaults, then `cord.toml`, then `CORD__*` variables
    ///
    /// `CORD__REST__MAX_RETRIES=5` sets `rest.max_retries`. `CORD_TOKEN` is
    /// honoured as a shortcut for the token.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let settings: Self = ::config::Config::builder()
            .set_default("env", "development")?
            .add_source(::config::File::with_name("cord").required(false))
            .add_source(
                ::config::Environment::default()
                    .prefix("CORD")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("token", env::var("CORD_TOKEN").ok())?
            .build()?
            .try_deserialize()?;

        settings.validated()
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.token.trim().is_empty() {
            return Err(ConfigError::MissingVar("CORD_TOKEN"));
        }
        if self.gateway.shard_count == 0 || self.gateway.shard_id >= self.gateway.shard_count {
            return Err(ConfigError::InvalidValue(
                "CORD_SHARD_ID",
                format!(
                    "shard {} is outside a shard count of {}",
                    self.gateway.shard_id, self.gateway.shard_count
                ),
            ));
        }
        Ok(self)
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),
}
