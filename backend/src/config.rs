//! Configuration management for Bistro Ledger
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (config/development.toml, config/production.toml)
//! 3. Environment variable overrides such as BISTRO__SERVER__PORT

use config::{ConfigError, Environment, File};
use serde::Deserialize;
use shared::MoneyFormat;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// First-run account configuration
    pub auth: AuthConfig,

    /// Money and quantity display convention
    pub display: MoneyFormat,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// SQLite connection URL, e.g. `sqlite://bistro.db`
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for signing JWT tokens
    pub secret: String,

    /// Access token expiration in seconds
    pub access_token_expiry: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// Username created when the users table is empty
    pub default_username: String,

    /// Password for that first account; override it in production
    pub default_password: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment =
            std::env::var("BISTRO_ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let display = MoneyFormat::default();

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "127.0.0.1")?
            .set_default("database.url", "sqlite://bistro.db")?
            .set_default("database.max_connections", 5)?
            .set_default("database.min_connections", 1)?
            .set_default("jwt.secret", "development-secret-key")?
            .set_default("jwt.access_token_expiry", 43200)?
            .set_default("auth.default_username", "admin")?
            .set_default("auth.default_password", "admin")?
            .set_default("display.symbol", display.symbol)?
            .set_default("display.decimal_separator", display.decimal_separator)?
            .set_default("display.group_separator", display.group_separator)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BISTRO_ prefix)
            .add_source(
                Environment::with_prefix("BISTRO")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            jwt: JwtConfig::default(),
            auth: AuthConfig::default(),
            display: MoneyFormat::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "127.0.0.1".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://bistro.db".to_string(),
            max_connections: 5,
            min_connections: 1,
        }
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "development-secret-key".to_string(),
            access_token_expiry: 43200,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            default_username: "admin".to_string(),
            default_password: "admin".to_string(),
        }
    }
}
