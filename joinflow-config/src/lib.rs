use core::fmt::{Debug, Display};
use core::time::Duration;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;

pub const CONFIG_FILE: &str = "joinflow.toml";
pub const ENV_PREFIX: &str = "JOINFLOW_";

const fn default_listen_address() -> SocketAddr {
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::new(0, 0, 0, 0), 3000))
}

const fn default_database_pool_size() -> usize {
    16
}

const fn default_storage_timeout_ms() -> u64 {
    5000
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    #[serde(default = "default_listen_address")]
    pub listen_address: SocketAddr,
    /// Without a database url the server keeps everything in memory.
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_database_pool_size")]
    pub database_pool_size: usize,
    /// Upper bound for a single storage round trip.
    #[serde(default = "default_storage_timeout_ms")]
    pub storage_timeout_ms: u64,
}

impl Config {
    #[must_use]
    pub const fn storage_timeout(&self) -> Duration {
        Duration::from_millis(self.storage_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            database_url: None,
            database_pool_size: default_database_pool_size(),
            storage_timeout_ms: default_storage_timeout_ms(),
        }
    }
}

#[derive(thiserror::Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Figment(#[from] Box<figment::Error>),
}

impl Debug for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Reads `joinflow.toml` from the working directory and lets `JOINFLOW_*`
/// environment variables override it.
pub fn get_config() -> Result<Config, ConfigError> {
    Figment::new()
        .merge(Toml::file(CONFIG_FILE))
        .merge(Env::prefixed(ENV_PREFIX))
        .extract()
        .map_err(|error| ConfigError::Figment(Box::new(error)))
}
