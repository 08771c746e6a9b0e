//! # Ports
//!
//! - `inbound` - `EnergyLedgerApi`, the operations the ledger exposes
//! - `outbound` - `WorldState` and `TimeSource`, what the ledger needs from its host

pub mod inbound;
pub mod outbound;
