//! # Value Objects
//!
//! Ledger configuration and the genesis account set.

use crate::domain::entities::AccountRegistration;

/// Configuration for the energy ledger.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Currency token symbol used in reports and messages (default: `TEC`).
    pub token_symbol: String,
    /// Accounts written by `init_ledger`.
    pub genesis_accounts: Vec<AccountRegistration>,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            token_symbol: "TEC".to_string(),
            genesis_accounts: default_genesis_accounts(),
        }
    }
}

impl LedgerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the currency token symbol.
    pub fn with_token_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.token_symbol = symbol.into();
        self
    }

    /// Replace the genesis account set.
    pub fn with_genesis_accounts(mut self, accounts: Vec<AccountRegistration>) -> Self {
        self.genesis_accounts = accounts;
        self
    }
}

fn genesis(
    id: &str,
    name: &str,
    energy: f64,
    energy_type: &str,
    currency: f64,
    daily_consumption: f64,
    available_energy: f64,
) -> AccountRegistration {
    AccountRegistration {
        id: id.to_string(),
        name: name.to_string(),
        initial_energy: energy,
        energy_type: energy_type.to_string(),
        initial_currency: currency,
        daily_consumption,
        available_energy,
    }
}

/// The five factories of the industrial zone the ledger starts with.
pub fn default_genesis_accounts() -> Vec<AccountRegistration> {
    vec![
        genesis("Factory01", "Solar Manufacturing Plant", 1000.0, "solar", 1000.0, 800.0, 1200.0),
        genesis("Factory02", "Wind Power Assembly", 800.0, "wind", 800.0, 750.0, 850.0),
        genesis("Factory03", "Tech Production Facility", 500.0, "footstep", 500.0, 600.0, 450.0),
        genesis("Factory04", "Heavy Industry Corp", 300.0, "solar", 300.0, 900.0, 250.0),
        genesis("Factory05", "Electronics Assembly", 600.0, "wind", 600.0, 550.0, 700.0),
    ]
}
