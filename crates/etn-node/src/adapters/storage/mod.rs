//! # Production Storage Adapters
//!
//! Enable the `rocksdb` feature to get the persistent world state:
//!
//! ```toml
//! etn-node = { path = "...", features = ["rocksdb"] }
//! ```
//!
//! Without it the node only offers `etn_ledger::InMemoryWorldState`.

#[cfg(feature = "rocksdb")]
pub mod rocksdb_adapter;

#[cfg(feature = "rocksdb")]
pub use rocksdb_adapter::{
    RocksDbConfig, RocksDbWorldState, CF_HISTORY, CF_META, CF_STATE, CF_VERSIONS,
    COLUMN_FAMILIES,
};

// Re-export the in-memory world state for the memory backend and tests
pub use etn_ledger::InMemoryWorldState;
