//! Environment-backed configuration
//!
//! - `MONGODB_URI` - connection string (required)
//! - `MONGODB_DATABASE` - database used by the liveness probe (default: demo-app)
//! - `DEBUG_EXPOSE_CREDENTIALS` - register the credential-echo debug route on `/`

use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Database name used when `MONGODB_DATABASE` is unset
pub const DEFAULT_DATABASE: &str = "demo-app";

/// Port for the HTTP listener
pub const HTTP_PORT: u16 = 8080;

/// Upper bound for draining the listener and releasing the database handle
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

pub const ENV_URI: &str = "MONGODB_URI";
pub const ENV_DATABASE: &str = "MONGODB_DATABASE";
pub const ENV_EXPOSE_CREDENTIALS: &str = "DEBUG_EXPOSE_CREDENTIALS";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
}

/// Runtime configuration for the service
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub uri: String,
    pub database: String,
    pub listen_addr: SocketAddr,
    pub shutdown_timeout: Duration,
    /// Serve `GET /` with the username and password from the URI.
    ///
    /// Leaks credentials to anyone who can reach the port. Off unless
    /// explicitly enabled.
    pub expose_credentials: bool,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// Empty values are treated the same as unset ones.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let uri = get(ENV_URI).ok_or(ConfigError::Missing(ENV_URI))?;
        let database = get(ENV_DATABASE).unwrap_or_else(|| DEFAULT_DATABASE.to_string());
        let expose_credentials = get(ENV_EXPOSE_CREDENTIALS)
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            uri,
            database,
            listen_addr: SocketAddr::from(([0, 0, 0, 0], HTTP_PORT)),
            shutdown_timeout: SHUTDOWN_TIMEOUT,
            expose_credentials,
        })
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
