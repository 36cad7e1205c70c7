//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::handlers::{DEFAULT_EVENT_QUEUE, DEFAULT_PUBLISH_TIMEOUT};

/// Secret used outside production when `JWT_SECRET` is not set
const DEVELOPMENT_JWT_SECRET: &str = "your-secret-key-here";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// HMAC secret for bearer tokens
    pub jwt_secret: String,

    /// Event sink connection URL
    pub redis_url: String,

    /// Queue lifecycle events are pushed to
    pub event_queue: String,

    /// Upper bound a request waits on a publish attempt, zero for no wait
    pub publish_timeout: Duration,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let var_or = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let database_url = match var("DATABASE_URL") {
            Some(url) => url,
            None => format!(
                "postgres://{}:{}@{}:{}/{}?sslmode={}",
                var_or("DB_USER", "postgres"),
                var_or("DB_PASSWORD", "postgres"),
                var_or("DB_HOST", "localhost"),
                var_or("DB_PORT", "5432"),
                var_or("DB_NAME", "redis_mq"),
                var_or("DB_SSLMODE", "disable"),
            ),
        };

        let database_max_connections = var_or("DATABASE_MAX_CONNECTIONS", "25")
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = var_or("HOST", "0.0.0.0");

        let port = var_or("PORT", "3003")
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = var_or("ENVIRONMENT", "development");

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None if environment == "production" => {
                return Err(ConfigError::MissingEnv("JWT_SECRET"));
            }
            None => DEVELOPMENT_JWT_SECRET.to_string(),
        };

        let redis_url = var_or("REDIS_URL", "redis://127.0.0.1:6379");

        let event_queue = var_or("EVENT_QUEUE", DEFAULT_EVENT_QUEUE);

        let publish_timeout = match var("PUBLISH_TIMEOUT_MS") {
            Some(ms) => Duration::from_millis(
                ms.parse()
                    .map_err(|_| ConfigError::InvalidValue("PUBLISH_TIMEOUT_MS"))?,
            ),
            None => DEFAULT_PUBLISH_TIMEOUT,
        };

        let log_format = match var_or("LOG_FORMAT", "pretty").to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => return Err(ConfigError::InvalidValue("LOG_FORMAT")),
        };

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            jwt_secret,
            redis_url,
            event_queue,
            publish_timeout,
            log_format,
        })
    }

    /// True when tokens are verified with the built-in development secret
    pub fn uses_development_secret(&self) -> bool {
        self.jwt_secret == DEVELOPMENT_JWT_SECRET
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}
