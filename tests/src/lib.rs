//! # Energy Token Ledger Test Suite
//!
//! Flows that cross module boundaries: the account ledger, trade settlement,
//! the offer book and the query layer driven together, through the typed API
//! and through JSON invocations.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── conservation.rs   # seeded random operation runs
//!     ├── registration.rs   # identity indices end to end
//!     ├── settlement.rs     # trade lifecycle over JSON invocations
//!     └── scenarios.rs      # a trading day across all modules
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p etn-tests
//! cargo test -p etn-tests integration::conservation::
//! ```

pub mod integration;
