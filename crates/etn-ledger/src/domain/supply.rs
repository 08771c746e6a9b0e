//! # Supply Audit
//!
//! Conservation check support: total energy and currency held across all
//! accounts. Transfers and settlements leave both totals unchanged; only a
//! mint raises the energy total, by exactly the minted amount.

use crate::domain::entities::Account;
use serde::{Deserialize, Serialize};

/// Sum of balances over a set of accounts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplyTotals {
    pub accounts: usize,
    pub energy: f64,
    pub currency: f64,
}

impl SupplyTotals {
    pub fn from_accounts<'a>(accounts: impl IntoIterator<Item = &'a Account>) -> Self {
        accounts
            .into_iter()
            .fold(SupplyTotals::default(), |mut totals, account| {
                totals.accounts += 1;
                totals.energy += account.energy_balance;
                totals.currency += account.currency_balance;
                totals
            })
    }
}
