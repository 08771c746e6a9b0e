//! # Energy Token Ledger (etn-ledger)
//!
//! State-transition engine for a tokenized energy market. Factory accounts
//! hold an energy-token balance and a currency-token balance; trades move
//! energy one way and currency the other under strict conservation rules.
//!
//! ## Components
//!
//! | Component | Owns |
//! |-----------|------|
//! | Account ledger | accounts, mint/transfer primitives, email and fiscal-id indices |
//! | Trade settlement | trade records, atomic two-account + one-trade settlement |
//! | Offer book | offer records and their status |
//! | Query layer | namespace scans, account history, supply audit |
//!
//! ## Ledger Invariants
//!
//! | Invariant | Description |
//! |-----------|-------------|
//! | Non-negative balances | energy and currency never go below zero |
//! | Conservation | transfers and settlements leave both totals unchanged |
//! | Audited issuance | only `mint` raises total energy supply |
//! | Atomic invocations | all writes of one call commit together or not at all |
//! | Unique identities | one account per email and per fiscal id |
//!
//! ## Crate Structure (Hexagonal Architecture)
//!
//! - `domain/` - records, errors, key namespaces, validation
//! - `ports/` - `EnergyLedgerApi` (inbound), `WorldState` and `TimeSource` (outbound)
//! - `service/` - `EnergyLedger` operations and the committing `LedgerService`
//! - `adapters/` - `InMemoryWorldState`
//! - `ipc/` - JSON invocation payloads and `LedgerHandler`
//!
//! ## Usage
//!
//! ```ignore
//! use etn_ledger::{EnergyLedgerApi, LedgerConfig, LedgerService};
//!
//! let mut ledger = LedgerService::in_memory(LedgerConfig::default());
//! ledger.init_ledger()?;
//!
//! ledger.create_trade("T1", "Factory01", "Factory02", 100.0, 2.0)?;
//! let trade = ledger.settle_trade("T1")?;
//! ```

pub mod adapters;
pub mod domain;
pub mod ipc;
pub mod ports;
pub mod service;

// Re-export key types for convenience
pub use adapters::InMemoryWorldState;
pub use domain::energy::{EnergyReport, EnergyStatus};
pub use domain::entities::{
    Account, AccountHistoryEntry, AccountRegistration, IdentityRegistration, IndexAttribute,
    IndexEntry, Offer, OfferDirection, OfferStatus, Timestamp, Trade, TradeStatus,
};
pub use domain::errors::{Asset, ErrorKind, LedgerError, RecordKind, StoreError};
pub use domain::keys::KeyPrefix;
pub use domain::supply::SupplyTotals;
pub use domain::value_objects::{default_genesis_accounts, LedgerConfig};
pub use ports::inbound::EnergyLedgerApi;
pub use ports::outbound::{
    CommitBatch, FixedTimeSource, KeyModification, ReadVersion, SystemTimeSource, TimeSource,
    Version, VersionedValue, WorldState,
};
pub use service::context::TxContext;
pub use service::{EnergyLedger, LedgerService};

// Re-export invocation types
pub use ipc::{InvocationError, LedgerHandler, LedgerRequest, LedgerResponse};
