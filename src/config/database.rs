//! Database section of the configuration.

use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

/// PostgreSQL connection settings.
///
/// Only `url` is mandatory; the pool bounds default to a small footprint
/// suited to a single onboarding service instance.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `postgres://` connection string.
    #[serde(default)]
    pub url: String,

    #[serde(default = "defaults::min_connections")]
    pub min_connections: u32,

    #[serde(default = "defaults::max_connections")]
    pub max_connections: u32,

    /// How long a request may wait for a pooled connection.
    #[serde(default = "defaults::acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,

    /// Apply pending sqlx migrations on startup.
    #[serde(default)]
    pub run_migrations: bool,
}

mod defaults {
    pub fn min_connections() -> u32 {
        2
    }
    pub fn max_connections() -> u32 {
        10
    }
    pub fn acquire_timeout_secs() -> u64 {
        30
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            min_connections: defaults::min_connections(),
            max_connections: defaults::max_connections(),
            acquire_timeout_secs: defaults::acquire_timeout_secs(),
            run_migrations: false,
        }
    }
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::Missing("ONBOARD__DATABASE__URL"));
        }
        let scheme_ok = ["postgres://", "postgresql://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme));
        if !scheme_ok {
            return Err(ValidationError::NotAPostgresUrl);
        }
        if self.min_connections > self.max_connections {
            return Err(ValidationError::PoolBoundsInverted);
        }
        if self.max_connections > 100 {
            return Err(ValidationError::PoolTooLarge(self.max_connections));
        }
        Ok(())
    }
}
