//! # Adapters
//!
//! - `storage/` - world-state backends

pub mod storage;
