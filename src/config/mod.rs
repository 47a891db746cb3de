//! Application configuration module
//!
//! Configuration is read from environment variables (and a `.env` file in
//! development) with the `POSTFINANCE_GATEWAY` prefix. Nested values use a
//! double underscore as separator.
//!
//! # Example
//!
//! ```no_run
//! use postfinance_gateway::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod database;
mod error;
mod memory;
mod postfinance;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use memory::MemoryStoreConfig;
pub use postfinance::PostfinanceConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Shop database; `None` selects the in-memory store
    pub database: Option<DatabaseConfig>,

    #[serde(default)]
    pub memory: MemoryStoreConfig,

    /// Merchant account and signing secrets
    pub postfinance: PostfinanceConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `POSTFINANCE_GATEWAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `POSTFINANCE_GATEWAY__POSTFINANCE__PSPID=shop` -> `postfinance.pspid = "shop"`
    /// - `POSTFINANCE_GATEWAY__DATABASE__URL=...` -> `database.url = ...`
    /// - `POSTFINANCE_GATEWAY__MEMORY__SEED_ORDERS_FILE=orders.json` -> `memory.seed_orders_file`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("POSTFINANCE_GATEWAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid section, or
    /// `DatabaseRequired` when production would run on the in-memory store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        match &self.database {
            Some(database) => database.validate()?,
            None if self.is_production() => return Err(ValidationError::DatabaseRequired),
            None => {}
        }
        self.postfinance.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
