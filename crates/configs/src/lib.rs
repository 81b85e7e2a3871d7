//! # configs
//!
//! Layered runtime configuration for the Quadboard binary. Sources, in
//! increasing precedence: built-in defaults, an optional `config/default`
//! file, and `QUADBOARD__`-prefixed environment variables (with `__` as the
//! section separator, e.g. `QUADBOARD__SERVER__PORT=9000`). Secrets stay
//! wrapped in `secrecy` types so they never show up in debug output.

use config::{Config, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub url: SecretString,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: SecretString,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Loads configuration; call `dotenvy::dotenv()` first if a `.env` file
    /// should participate.
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080_i64)?
            .set_default("database.url", "postgres://localhost/quadboard")?
            .set_default("database.max_connections", 10_i64)?
            // Dev-only default; any real deployment overrides this.
            .set_default("auth.jwt_secret", "quadboard-dev-secret")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(Environment::with_prefix("QUADBOARD").separator("__"))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults_are_complete() {
        let cfg = AppConfig::load().expect("defaults should satisfy the schema");
        assert_eq!(cfg.server.bind_addr(), "127.0.0.1:8080");
        assert_eq!(cfg.database.max_connections, 10);
        assert!(!cfg.auth.jwt_secret.expose_secret().is_empty());
    }
}
