//! Configuration error types.

use thiserror::Error;

/// Failure to assemble the configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Could not read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Configuration rejected: {0}")]
    Invalid(#[from] ValidationError),
}

/// A configuration value that parsed but does not make sense.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Server port must be non-zero")]
    PortIsZero,

    #[error("Request timeout must be between 1 and 300 seconds")]
    TimeoutOutOfRange,

    #[error("Database URL must use the postgres scheme")]
    NotAPostgresUrl,

    #[error("Pool minimum cannot exceed pool maximum")]
    PoolBoundsInverted,

    #[error("Pool maximum of {0} exceeds the allowed ceiling of 100")]
    PoolTooLarge(u32),
}
