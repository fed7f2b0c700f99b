//! Application configuration structs
//!
//! Everything is read from environment variables (a `.env` file is honoured
//! in development). Chat limits fall back to built-in defaults.

use chat_core::MuteWindow;
use serde::Deserialize;
use std::env;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
    pub snowflake: SnowflakeConfig,
    pub chat: ChatConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" | "dev" => Some(Self::Development),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Directory holding the SQL migrations applied at startup
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// JWT configuration
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Chat engine limits
#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Shortest allowed timed mute, in seconds
    #[serde(default = "default_mute_min_secs")]
    pub mute_min_secs: i64,
    /// Longest allowed timed mute, in seconds
    #[serde(default = "default_mute_max_secs")]
    pub mute_max_secs: i64,
    /// Upper bound on `per_page` for transcript exports
    #[serde(default = "default_export_max_page_size")]
    pub export_max_page_size: i64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            mute_min_secs: default_mute_min_secs(),
            mute_max_secs: default_mute_max_secs(),
            export_max_page_size: default_export_max_page_size(),
        }
    }
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    #[serde(default)]
    pub worker_id: u16,
}

// Default value functions
fn default_app_name() -> String {
    "chat-engine".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    20
}

fn default_min_connections() -> u32 {
    5
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_access_token_expiry() -> i64 {
    900 // 15 minutes
}

fn default_migrations_dir() -> String {
    "crates/chat-db/migrations".to_string()
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn default_mute_min_secs() -> i64 {
    3600 // 1 hour
}

fn default_mute_max_secs() -> i64 {
    2_592_000 // 30 days
}

fn default_export_max_page_size() -> i64 {
    1000
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: parse_var("API_PORT")
                    .ok_or(ConfigError::MissingVar("API_PORT"))?,
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(default_max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or_else(default_min_connections),
                migrations_dir: env::var("CHAT_MIGRATIONS_DIR")
                    .unwrap_or_else(|_| default_migrations_dir()),
            },
            redis: RedisConfig {
                url: env::var("REDIS_URL").map_err(|_| ConfigError::MissingVar("REDIS_URL"))?,
                max_connections: parse_var("REDIS_MAX_CONNECTIONS")
                    .unwrap_or_else(default_redis_max_connections),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").map_err(|_| ConfigError::MissingVar("JWT_SECRET"))?,
                access_token_expiry: parse_var("JWT_ACCESS_TOKEN_EXPIRY")
                    .unwrap_or_else(default_access_token_expiry),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parse_var("RATE_LIMIT_REQUESTS_PER_SECOND")
                    .unwrap_or_else(default_requests_per_second),
                burst: parse_var("RATE_LIMIT_BURST")
                    .unwrap_or_else(default_burst),
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
            snowflake: SnowflakeConfig {
                worker_id: parse_var("WORKER_ID").unwrap_or(0),
            },
            chat: Self::chat_from_env()?,
        })
    }

    fn chat_from_env() -> Result<ChatConfig, ConfigError> {
        let chat = ChatConfig {
            mute_min_secs: parse_var("CHAT_MUTE_MIN_SECS").unwrap_or_else(default_mute_min_secs),
            mute_max_secs: parse_var("CHAT_MUTE_MAX_SECS").unwrap_or_else(default_mute_max_secs),
            export_max_page_size: parse_var("CHAT_EXPORT_MAX_PAGE_SIZE")
                .unwrap_or_else(default_export_max_page_size),
        };
        chat.validate()?;
        Ok(chat)
    }
}

impl ChatConfig {
    /// Mute bounds as a domain value object
    #[must_use]
    pub fn mute_window(&self) -> MuteWindow {
        MuteWindow::from_secs(self.mute_min_secs, self.mute_max_secs)
    }

    /// Reject bound combinations that would make every timed mute invalid
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` for negative or inverted bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mute_min_secs < 0 {
            return Err(ConfigError::InvalidValue(
                "CHAT_MUTE_MIN_SECS",
                self.mute_min_secs.to_string(),
            ));
        }
        if self.mute_max_secs < self.mute_min_secs {
            return Err(ConfigError::InvalidValue(
                "CHAT_MUTE_MAX_SECS",
                format!("{} is below the minimum {}", self.mute_max_secs, self.mute_min_secs),
            ));
        }
        if self.export_max_page_size < 1 {
            return Err(ConfigError::InvalidValue(
                "CHAT_EXPORT_MAX_PAGE_SIZE",
                self.export_max_page_size.to_string(),
            ));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
