//! Typed application configuration.
//!
//! Settings come from the process environment (a `.env` file is folded in
//! first during development, via `dotenvy`). Keys use the `ONBOARD` prefix
//! with `__` separating nesting levels, so `ONBOARD__DATABASE__URL` lands in
//! `database.url` and `ONBOARD__SERVER__PORT` in `server.port`. Each section
//! carries its own `validate()`; `AppConfig::load` returns the parsed tree
//! and the binary validates before wiring anything.

mod database;
mod error;
mod server;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root of the configuration tree.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl AppConfig {
    /// Reads configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` when a value cannot be parsed into the
    /// declared type. Semantic problems (missing URL, inverted pool
    /// bounds) are reported by [`AppConfig::validate`], not here.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let parsed = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("ONBOARD")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(parsed)
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        Ok(())
    }
}
