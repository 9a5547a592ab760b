//! Server section of the configuration.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

/// HTTP server settings.
///
/// Every field has a workable default; a bare environment boots a
/// development server on `0.0.0.0:8080`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_level: String,
    pub request_timeout_secs: u64,
    /// Comma-separated origin allowlist. Unset means allow any origin,
    /// which is only sensible in development.
    pub cors_origins: Option<String>,
}

/// Deployment environment. Production switches log output to JSON.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            environment: Environment::Development,
            log_level: "info,onboard_flow=debug,sqlx=warn".to_string(),
            request_timeout_secs: 30,
            cors_origins: None,
        }
    }
}

impl ServerConfig {
    /// Address the listener binds to. An unparseable host falls back to
    /// all interfaces; `validate` has already flagged the bad value.
    pub fn bind_addr(&self) -> SocketAddr {
        let ip: IpAddr = self.host.parse().unwrap_or([0, 0, 0, 0].into());
        SocketAddr::new(ip, self.port)
    }

    /// Per-request deadline applied by the timeout layer.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Splits the origin allowlist; empty when no list was configured.
    pub fn cors_origins_list(&self) -> Vec<String> {
        match &self.cors_origins {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.host.parse::<IpAddr>().is_err() {
            return Err(ValidationError::Missing("a parseable server host"));
        }
        if self.port == 0 {
            return Err(ValidationError::PortIsZero);
        }
        if !(1..=300).contains(&self.request_timeout_secs) {
            return Err(ValidationError::TimeoutOutOfRange);
        }
        Ok(())
    }
}
