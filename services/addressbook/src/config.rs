//! Process configuration, read once at startup
//!
//! Nothing below the binary reads the environment; components receive the
//! pieces of [`AppConfig`] they need at construction.

use anyhow::Result;
use common::database::DatabaseConfig;
use std::{net::SocketAddr, str::FromStr};

use crate::jwt::JwtConfig;

/// Address used when `BIND_ADDRESS` is not set
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Where users and contacts are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// PostgreSQL through the connection pool
    Postgres,
    /// Process memory, lost on restart
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => anyhow::bail!("Unknown STORAGE_BACKEND {:?}: expected postgres or memory", other),
        }
    }
}

/// Immutable configuration for the whole service
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_address: SocketAddr,
    pub storage: StorageBackend,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDRESS`: Listen address (default: `0.0.0.0:8000`)
    /// - `STORAGE_BACKEND`: `postgres` or `memory` (default: `postgres`)
    /// - the `DATABASE_*` variables read by [`DatabaseConfig::from_env`]
    /// - the `JWT_*` variables read by [`JwtConfig::from_env`]
    pub fn from_env() -> Result<Self> {
        let bind_address = std::env::var("BIND_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| anyhow::anyhow!("Invalid BIND_ADDRESS: {}", e))?;

        let storage = std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .parse::<StorageBackend>()?;

        Ok(AppConfig {
            bind_address,
            storage,
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
        })
    }
}
