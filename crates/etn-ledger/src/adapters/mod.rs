//! # Adapters
//!
//! In-process implementations of the outbound ports. The persistent RocksDB
//! world state lives in the node crate.

pub mod memory;

pub use memory::InMemoryWorldState;
