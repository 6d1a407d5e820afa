//! Server settings loaded from environment variables.
//!
//! `.env` is read by `main` through `dotenvy` before [`ServerConfig::from_env`]
//! runs, so every setting can live there as well.

use super::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use std::{net::SocketAddr, path::PathBuf};

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";
/// User that requests without an `x-user-id` header act as.
pub const DEFAULT_DEMO_USER_ID: i64 = 1;
/// Default seed catalog location.
pub const DEFAULT_CATALOG_PATH: &str = "catalog.toml";

/// Which storage adapter backs the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    /// Everything in process memory, lost on exit
    Memory,
    /// A `SeaORM` database at the given URL
    Database(String),
}

impl StorageBackend {
    /// `memory` selects the in-memory adapter, anything else is a database URL.
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        if url.trim().eq_ignore_ascii_case("memory") {
            Self::Memory
        } else {
            Self::Database(url.trim().to_string())
        }
    }
}

/// Runtime settings of the HTTP service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the listener binds to (`BIND_ADDR`)
    pub bind_addr: SocketAddr,
    /// Storage adapter (`DATABASE_URL`)
    pub storage: StorageBackend,
    /// Fallback caller identity (`DEMO_USER_ID`)
    pub demo_user_id: i64,
    /// Seed catalog file (`CATALOG_PATH`)
    pub catalog_path: PathBuf,
}

impl ServerConfig {
    /// Reads the settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the settings through `lookup`, falling back to defaults for
    /// unset variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = lookup("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()?;

        let storage = StorageBackend::from_url(
            &lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
        );

        let demo_user_id = match lookup("DEMO_USER_ID") {
            Some(raw) => raw.trim().parse::<i64>().map_err(|e| Error::Config {
                message: format!("DEMO_USER_ID must be an integer, got '{raw}': {e}"),
            })?,
            None => DEFAULT_DEMO_USER_ID,
        };

        let catalog_path = PathBuf::from(
            lookup("CATALOG_PATH").unwrap_or_else(|| DEFAULT_CATALOG_PATH.to_string()),
        );

        Ok(Self {
            bind_addr,
            storage,
            demo_user_id,
            catalog_path,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        ServerConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(
            config.storage,
            StorageBackend::Database(DEFAULT_DATABASE_URL.to_string())
        );
        assert_eq!(config.demo_user_id, 1);
        assert_eq!(config.catalog_path, PathBuf::from("catalog.toml"));
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("BIND_ADDR", "0.0.0.0:8080"),
            ("DATABASE_URL", "Memory"),
            ("DEMO_USER_ID", " 7 "),
            ("CATALOG_PATH", "/etc/ecomart/catalog.toml"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.demo_user_id, 7);
        assert_eq!(
            config.catalog_path,
            PathBuf::from("/etc/ecomart/catalog.toml")
        );
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            config_from(&[("BIND_ADDR", "not an address")]),
            Err(Error::AddrParse(_))
        ));
        assert!(matches!(
            config_from(&[("DEMO_USER_ID", "first")]),
            Err(Error::Config { .. })
        ));
    }
}
