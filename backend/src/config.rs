//! Server configuration.
//!
//! Values come from the process environment (after `.env` is loaded by
//! `main`). Defaults are convenient for local development; production mode
//! refuses to start without an explicit signing secret and database.

use chrono::Duration;
use config::{builder::DefaultState, Config, ConfigBuilder, Environment};
use serde::Deserialize;
use thiserror::Error;

/// Signing secret used when none is configured outside production.
/// Anyone can forge tokens with it.
pub const DEV_JWT_SECRET: &str = "development-secret-change-in-production";

pub const DEFAULT_PORT: u16 = 5001;
pub const DEFAULT_BCRYPT_COST: u32 = 10;
/// Work factor bounds accepted by bcrypt.
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("JWT_SECRET must be set when APP_ENV=production")]
    MissingSecret,

    #[error("DATABASE_URL must be set when APP_ENV=production")]
    MissingDatabase,

    #[error("unknown APP_ENV {0:?}, expected development or production")]
    UnknownEnvironment(String),

    #[error("BCRYPT_COST must be between {min} and {max}, got {got}")]
    InvalidCost { min: u32, max: u32, got: u32 },

    #[error("TOKEN_TTL_HOURS must be positive, got {0}")]
    InvalidTtl(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: &str) -> Result<Self, ConfigError> {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" | "" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(ConfigError::UnknownEnvironment(other.to_string())),
        }
    }
}

/// Shape of the raw environment, before validation.
#[derive(Debug, Deserialize)]
struct RawSettings {
    app_env: String,
    jwt_secret: Option<String>,
    database_url: Option<String>,
    port: u16,
    bcrypt_cost: u32,
    token_ttl_hours: i64,
    cors_allowed_origins: Option<String>,
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: AppEnv,
    pub jwt_secret: String,
    pub database_url: Option<String>,
    pub port: u16,
    pub bcrypt_cost: u32,
    pub token_ttl: Duration,
    pub cors_allowed_origins: Vec<String>,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("jwt_secret", &"<redacted>")
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("port", &self.port)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("token_ttl", &self.token_ttl)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

impl AppConfig {
    /// Builder pre-populated with every default; callers add sources or
    /// overrides on top.
    pub fn builder() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Ok(Config::builder()
            .set_default("app_env", "development")?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("bcrypt_cost", i64::from(DEFAULT_BCRYPT_COST))?
            .set_default("token_ttl_hours", DEFAULT_TOKEN_TTL_HOURS)?)
    }

    /// Load configuration from environment variables.
    ///
    /// Recognised vars: `APP_ENV`, `JWT_SECRET`, `DATABASE_URL`, `PORT`,
    /// `BCRYPT_COST`, `TOKEN_TTL_HOURS`, `CORS_ALLOWED_ORIGINS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::builder()?
            .add_source(Environment::default())
            .build()?;
        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let raw: RawSettings = config.try_deserialize()?;
        let env = AppEnv::parse(&raw.app_env)?;

        let jwt_secret = match raw.jwt_secret.filter(|s| !s.trim().is_empty()) {
            Some(secret) if env == AppEnv::Production && secret == DEV_JWT_SECRET => {
                return Err(ConfigError::MissingSecret)
            }
            Some(secret) => secret,
            None if env == AppEnv::Production => return Err(ConfigError::MissingSecret),
            None => {
                tracing::warn!("JWT_SECRET not set, using the insecure development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let database_url = raw.database_url.filter(|s| !s.trim().is_empty());
        if database_url.is_none() && env == AppEnv::Production {
            return Err(ConfigError::MissingDatabase);
        }

        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&raw.bcrypt_cost) {
            return Err(ConfigError::InvalidCost {
                min: MIN_BCRYPT_COST,
                max: MAX_BCRYPT_COST,
                got: raw.bcrypt_cost,
            });
        }

        if raw.token_ttl_hours <= 0 {
            return Err(ConfigError::InvalidTtl(raw.token_ttl_hours));
        }

        let cors_allowed_origins = raw
            .cors_allowed_origins
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            env,
            jwt_secret,
            database_url,
            port: raw.port,
            bcrypt_cost: raw.bcrypt_cost,
            token_ttl: Duration::hours(raw.token_ttl_hours),
            cors_allowed_origins,
        })
    }
}
