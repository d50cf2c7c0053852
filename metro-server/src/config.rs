//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Directory holding `Fare.csv`, `Time.csv`, `Route.csv` and the optional
/// coordinates file.
pub const DATA_DIR_VAR: &str = "METRO_DATA_DIR";
pub const BIND_ADDR_VAR: &str = "METRO_BIND_ADDR";
pub const STATIC_DIR_VAR: &str = "METRO_STATIC_DIR";

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{var} is not a socket address: {value}")]
    InvalidAddress { var: &'static str, value: String },
}

/// Where to read data from and where to listen.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub data_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Read configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through `lookup`, falling back to defaults for
    /// unset or blank variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str, default: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let addr = get(BIND_ADDR_VAR, DEFAULT_BIND_ADDR);
        let bind_addr = addr.parse().map_err(|_| ConfigError::InvalidAddress {
            var: BIND_ADDR_VAR,
            value: addr.clone(),
        })?;

        Ok(Self {
            data_dir: get(DATA_DIR_VAR, DEFAULT_DATA_DIR).into(),
            bind_addr,
            static_dir: get(STATIC_DIR_VAR, DEFAULT_STATIC_DIR).into(),
        })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.into(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            static_dir: DEFAULT_STATIC_DIR.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn overrides_are_read() {
        let config = ServerConfig::from_lookup(lookup(&[
            (DATA_DIR_VAR, "/srv/metro"),
            (BIND_ADDR_VAR, "0.0.0.0:8080"),
            (STATIC_DIR_VAR, " assets "),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/metro"));
        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(config.static_dir, PathBuf::from("assets"));
    }

    #[test]
    fn blank_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup(&[(DATA_DIR_VAR, "  ")])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
    }

    #[test]
    fn bad_address_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[(BIND_ADDR_VAR, "localhost")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidAddress {
                var: BIND_ADDR_VAR,
                value: "localhost".into()
            }
        );
    }
}
