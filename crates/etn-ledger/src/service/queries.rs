//! # Query Layer
//!
//! Read-only projections over the world state: per-namespace scans, the
//! trades an account took part in, account history and the supply audit.
//!
//! A record in a namespace that fails to decode is skipped with a warning;
//! one bad record never hides the rest of a collection.

use super::context::{decode_record, TxContext};
use super::EnergyLedger;
use crate::domain::entities::{
    Account, AccountHistoryEntry, Offer, OfferStatus, Trade,
};
use crate::domain::errors::LedgerError;
use crate::domain::keys::{display_key, KeyPrefix};
use crate::domain::supply::SupplyTotals;
use crate::ports::outbound::WorldState;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

impl EnergyLedger {
    /// Decode every record under one namespace, skipping undecodable ones.
    fn scan_namespace<T, S>(
        &self,
        ctx: &TxContext<'_, S>,
        prefix: KeyPrefix,
    ) -> Result<Vec<T>, LedgerError>
    where
        T: DeserializeOwned,
        S: WorldState,
    {
        let (start, end) = prefix.range();
        let rows = ctx.range_scan(&start, &end)?;
        let scanned = rows.len();

        let records: Vec<T> = rows
            .into_iter()
            .filter_map(|(key, bytes)| match decode_record(&key, &bytes) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(key = %display_key(&key), error = %e, "[etn] skipping undecodable record");
                    None
                }
            })
            .collect();

        debug!(
            prefix = %display_key(prefix.as_bytes()),
            scanned,
            decoded = records.len(),
            "[etn] namespace scanned"
        );
        Ok(records)
    }

    /// Accounts with a non-empty id and name.
    pub fn list_accounts<S: WorldState>(
        &self,
        ctx: &TxContext<'_, S>,
    ) -> Result<Vec<Account>, LedgerError> {
        let accounts: Vec<Account> = self.scan_namespace(ctx, KeyPrefix::Account)?;
        Ok(accounts
            .into_iter()
            .filter(|a| !a.id.is_empty() && !a.name.is_empty())
            .collect())
    }

    /// Trades with a non-empty trade id.
    pub fn list_trades<S: WorldState>(
        &self,
        ctx: &TxContext<'_, S>,
    ) -> Result<Vec<Trade>, LedgerError> {
        let trades: Vec<Trade> = self.scan_namespace(ctx, KeyPrefix::Trade)?;
        Ok(trades
            .into_iter()
            .filter(|t| !t.trade_id.is_empty())
            .collect())
    }

    pub fn list_trades_for_account<S: WorldState>(
        &self,
        ctx: &TxContext<'_, S>,
        account_id: &str,
    ) -> Result<Vec<Trade>, LedgerError> {
        Ok(self
            .list_trades(ctx)?
            .into_iter()
            .filter(|t| t.involves(account_id))
            .collect())
    }

    /// Offers currently marked active. Order follows key order.
    pub fn list_active_offers<S: WorldState>(
        &self,
        ctx: &TxContext<'_, S>,
    ) -> Result<Vec<Offer>, LedgerError> {
        let offers: Vec<Offer> = self.scan_namespace(ctx, KeyPrefix::Offer)?;
        Ok(offers
            .into_iter()
            .filter(|o| o.status == OfferStatus::Active)
            .collect())
    }

    /// Every committed write to one account, oldest first.
    ///
    /// An unknown id yields an empty history rather than `NotFound`.
    pub fn account_history<S: WorldState>(
        &self,
        ctx: &TxContext<'_, S>,
        account_id: &str,
    ) -> Result<Vec<AccountHistoryEntry>, LedgerError> {
        let key = KeyPrefix::account_key(account_id);
        ctx.history_for_key(&key)?
            .into_iter()
            .map(|modification| {
                let account = if modification.is_delete {
                    None
                } else {
                    Some(decode_record::<Account>(&key, &modification.value)?)
                };
                Ok(AccountHistoryEntry {
                    tx_id: modification.tx_id,
                    account,
                    timestamp: modification.timestamp,
                    is_delete: modification.is_delete,
                })
            })
            .collect()
    }

    /// Energy and currency held across every account.
    pub fn total_supply<S: WorldState>(
        &self,
        ctx: &TxContext<'_, S>,
    ) -> Result<SupplyTotals, LedgerError> {
        let accounts = self.list_accounts(ctx)?;
        Ok(SupplyTotals::from_accounts(&accounts))
    }
}
