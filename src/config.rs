//! Service configuration.
//!
//! Every flag can also be set through the environment; `.env` files are
//! loaded before parsing (see [`load_env`]).

use crate::store::{DashboardStore, KvStore, MemoryKv, SqliteKv};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use dotenv::dotenv;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "prismfin")]
#[command(about = "PrismFin dashboard API - mock portfolio, risk and sentiment data")]
pub struct Config {
    /// Bind address
    #[arg(long, env = "PRISMFIN_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Bind port
    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    /// State storage backend
    #[arg(long, env = "PRISMFIN_STORE", value_enum, default_value = "sqlite")]
    pub store: StoreBackend,

    /// SQLite file for the state record (relative paths resolve against the crate dir)
    #[arg(long, env = "PRISMFIN_DB_PATH", default_value = "prismfin_state.db")]
    pub db_path: String,
}

impl Config {
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|e| anyhow::anyhow!("invalid bind address '{}': {}", addr, e))
    }

    pub fn resolved_db_path(&self) -> PathBuf {
        resolve_data_path(&self.db_path)
    }

    /// Open the configured backend and wrap it in a store.
    pub fn open_store(&self) -> Result<DashboardStore> {
        let kv: Arc<dyn KvStore> = match self.store {
            StoreBackend::Memory => {
                info!("💾 Using in-memory state store");
                Arc::new(MemoryKv::new())
            }
            StoreBackend::Sqlite => {
                let path = self.resolved_db_path();
                info!("💾 State database at: {}", path.display());
                Arc::new(SqliteKv::new(&path)?)
            }
        };
        Ok(DashboardStore::new(kv))
    }
}

/// Relative paths are taken relative to the crate directory, not the cwd.
pub fn resolve_data_path(raw: &str) -> PathBuf {
    let p = PathBuf::from(raw.trim());
    if p.is_absolute() {
        return p;
    }
    Path::new(env!("CARGO_MANIFEST_DIR")).join(p)
}

pub fn load_env() {
    // 1) Standard dotenv search (cwd + parents)
    let _ = dotenv();

    // 2) Also try the crate-root .env when running with --manifest-path from elsewhere
    let candidate = Path::new(env!("CARGO_MANIFEST_DIR")).join(".env");
    if candidate.exists() {
        let _ = dotenv::from_path(&candidate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        for var in ["PRISMFIN_HOST", "PORT", "PRISMFIN_STORE", "PRISMFIN_DB_PATH"] {
            std::env::remove_var(var);
        }
        let config = Config::try_parse_from(["prismfin"]).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.store, StoreBackend::Sqlite);
        assert_eq!(config.bind_addr().unwrap().port(), 3000);
    }

    #[test]
    fn test_flags() {
        let config =
            Config::try_parse_from(["prismfin", "--port", "8081", "--store", "memory"]).unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.store, StoreBackend::Memory);
        assert!(config.open_store().is_ok());
    }

    #[test]
    fn test_resolve_data_path() {
        assert_eq!(resolve_data_path("/tmp/x.db"), PathBuf::from("/tmp/x.db"));
        assert!(resolve_data_path("state.db").ends_with("state.db"));
        assert!(resolve_data_path("state.db").is_absolute());
    }
}
