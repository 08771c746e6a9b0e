//! # Energy Ledger Node
//!
//! Host process for the energy ledger.
//!
//! ## Modular Structure
//!
//! - `config` - `NodeConfig`, environment overrides and validation
//! - `adapters/` - world-state backends (RocksDB behind the `rocksdb` feature)
//! - `runtime` - `LedgerNode`, which drives the ledger with JSON invocations

pub mod adapters;
pub mod config;
pub mod runtime;

pub use config::{ConfigError, NodeConfig, StorageBackend, StorageConfig};
pub use runtime::{LedgerNode, ReplaySummary};
