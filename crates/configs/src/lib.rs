//! Layered configuration for the Top 5 Lister binary.
//!
//! Values come from the environment (prefix `TOP5`, `__` as the section
//! separator, e.g. `TOP5__SERVER__PORT=8000`), with `.env` files loaded by
//! the binary before this runs. Secrets stay wrapped in `SecretString`.

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: SecretString,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: SecretString,
    pub token_ttl_hours: i64,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let cfg: Self = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8000_i64)?
            .set_default("database.max_connections", 5_i64)?
            .set_default("auth.token_ttl_hours", 24_i64)?
            .add_source(config::Environment::with_prefix("TOP5").separator("__"))
            .build()?
            .try_deserialize()?;
        debug!(host = %cfg.server.host, port = cfg.server.port, "configuration loaded");
        Ok(cfg)
    }
}
