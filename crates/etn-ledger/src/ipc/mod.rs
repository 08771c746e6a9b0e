//! # Invocation Interface
//!
//! - `payloads`: request, response and error documents, one request per operation
//! - `handler`: `LedgerHandler`, which routes a request to `EnergyLedgerApi`

pub mod handler;
pub mod payloads;

pub use handler::LedgerHandler;
pub use payloads::*;
