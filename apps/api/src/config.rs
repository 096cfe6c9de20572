//! Application configuration, loaded from environment variables.

use axum_helpers::JwtConfig;
use core_config::server::ServerConfig;
use core_config::smtp::SmtpConfig;
use core_config::storage::StorageConfig;
use core_config::{env_or_default, AppInfo, ConfigError, Environment, FromEnv};
use database::postgres::PostgresConfig;
use database::redis::RedisConfig;

/// Full configuration of the storefront API.
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: PostgresConfig,
    pub redis: RedisConfig,
    pub jwt: JwtConfig,
    pub smtp: SmtpConfig,
    pub storage: StorageConfig,
    /// Base URL password-reset links point at
    pub frontend_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app: core_config::app_info!(),
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            database: PostgresConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            smtp: SmtpConfig::from_env()?,
            storage: StorageConfig::from_env()?,
            frontend_url: env_or_default("FRONTEND_URL", "http://localhost:3000"),
        })
    }
}
