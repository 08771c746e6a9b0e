//! # Domain Layer
//!
//! Pure domain logic for the energy ledger. Nothing here touches the world
//! state; operations that read and write records live in `service`.
//!
//! ## Modules
//!
//! - `entities` - Account, Trade, Offer, index entries, history entries
//! - `errors` - Ledger error taxonomy and world-state errors
//! - `keys` - Key namespaces per record kind
//! - `energy` - Surplus/deficit view of an account
//! - `supply` - Balance totals for conservation audits
//! - `validation` - Argument checks run before any read or write
//! - `value_objects` - Ledger configuration and genesis accounts

pub mod energy;
pub mod entities;
pub mod errors;
pub mod keys;
pub mod supply;
pub mod validation;
pub mod value_objects;
