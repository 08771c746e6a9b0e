//! # Node Configuration
//!
//! Built in three layers: `Default`, then environment overrides, then CLI
//! flags (applied in `main.rs`).
//!
//! | Variable | Field |
//! |----------|-------|
//! | `ETN_STORAGE` | `storage.backend` (`memory` or `rocksdb`) |
//! | `ETN_DATA_DIR` | `storage.data_dir` |
//! | `ETN_SYNC_WRITES` | `storage.sync_writes` |
//! | `ETN_TOKEN_SYMBOL` | `ledger.token_symbol` |
//! | `ETN_LOG` | `log_filter` |

use etn_ledger::LedgerConfig;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// World-state configuration.
    pub storage: StorageConfig,
    /// Ledger configuration (token symbol, genesis accounts).
    pub ledger: LedgerConfig,
    /// `tracing` filter directive; `None` falls back to `RUST_LOG`, then `info`.
    pub log_filter: Option<String>,
}

/// Which world state backs the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageBackend {
    /// Volatile; state lives for one process.
    #[default]
    Memory,
    /// Persistent RocksDB database under `data_dir`.
    RocksDb,
}

impl FromStr for StorageBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memory" | "mem" => Ok(StorageBackend::Memory),
            "rocksdb" | "rocks" => Ok(StorageBackend::RocksDb),
            _ => Err(ConfigError::UnknownBackend(s.to_string())),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Data directory for the RocksDB backend.
    pub data_dir: PathBuf,
    /// fsync every commit.
    pub sync_writes: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            data_dir: PathBuf::from("./data/ledger"),
            sync_writes: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown storage backend '{0}' (expected memory or rocksdb)")]
    UnknownBackend(String),

    #[error("ETN_SYNC_WRITES must be true or false, got '{0}'")]
    InvalidSyncWrites(String),

    #[error("the rocksdb backend is not compiled in; rebuild with --features rocksdb")]
    RocksDbUnavailable,

    #[error("token symbol must not be empty")]
    EmptyTokenSymbol,
}

impl NodeConfig {
    /// Default configuration with process environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Default configuration with overrides read through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = NodeConfig::default();

        if let Some(backend) = lookup("ETN_STORAGE") {
            config.storage.backend = backend.parse()?;
        }
        if let Some(dir) = lookup("ETN_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(sync) = lookup("ETN_SYNC_WRITES") {
            config.storage.sync_writes = sync
                .parse()
                .map_err(|_| ConfigError::InvalidSyncWrites(sync))?;
        }
        if let Some(symbol) = lookup("ETN_TOKEN_SYMBOL") {
            config.ledger.token_symbol = symbol;
        }
        if let Some(filter) = lookup("ETN_LOG") {
            config.log_filter = Some(filter);
        }

        Ok(config)
    }

    /// Reject configurations the node cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ledger.token_symbol.trim().is_empty() {
            return Err(ConfigError::EmptyTokenSymbol);
        }
        if self.storage.backend == StorageBackend::RocksDb && !cfg!(feature = "rocksdb") {
            return Err(ConfigError::RocksDbUnavailable);
        }
        Ok(())
    }
}
