//! # EnergyLedgerApi Implementation

use super::LedgerService;
use crate::domain::energy::EnergyReport;
use crate::domain::entities::{
    Account, AccountHistoryEntry, AccountRegistration, IdentityRegistration, Offer,
    OfferDirection, OfferStatus, Trade,
};
use crate::domain::errors::LedgerError;
use crate::domain::supply::SupplyTotals;
use crate::ports::inbound::EnergyLedgerApi;
use crate::ports::outbound::{TimeSource, WorldState};

impl<S, T> EnergyLedgerApi for LedgerService<S, T>
where
    S: WorldState,
    T: TimeSource,
{
    fn init_ledger(&mut self) -> Result<usize, LedgerError> {
        self.execute("init_ledger", |ledger, ctx| ledger.init_ledger(ctx))
    }

    fn register_account(&mut self, reg: AccountRegistration) -> Result<Account, LedgerError> {
        self.execute("register_account", |ledger, ctx| {
            ledger.register_account(ctx, &reg)
        })
    }

    fn register_account_with_identity(
        &mut self,
        reg: IdentityRegistration,
    ) -> Result<Account, LedgerError> {
        self.execute("register_account_with_identity", |ledger, ctx| {
            ledger.register_account_with_identity(ctx, &reg)
        })
    }

    fn mint(&mut self, account_id: &str, amount: f64) -> Result<Account, LedgerError> {
        self.execute("mint", |ledger, ctx| ledger.mint(ctx, account_id, amount))
    }

    fn transfer(&mut self, from_id: &str, to_id: &str, amount: f64) -> Result<(), LedgerError> {
        self.execute("transfer", |ledger, ctx| {
            ledger.transfer(ctx, from_id, to_id, amount)
        })
    }

    fn update_available_energy(&mut self, account_id: &str, value: f64) -> Result<Account, LedgerError> {
        self.execute("update_available_energy", |ledger, ctx| {
            ledger.update_available_energy(ctx, account_id, value)
        })
    }

    fn update_daily_consumption(&mut self, account_id: &str, value: f64) -> Result<Account, LedgerError> {
        self.execute("update_daily_consumption", |ledger, ctx| {
            ledger.update_daily_consumption(ctx, account_id, value)
        })
    }

    fn update_telemetry(
        &mut self,
        account_id: &str,
        current_generation: f64,
        current_consumption: f64,
    ) -> Result<Account, LedgerError> {
        self.execute("update_telemetry", |ledger, ctx| {
            ledger.update_telemetry(ctx, account_id, current_generation, current_consumption)
        })
    }

    fn get_account(&self, account_id: &str) -> Result<Account, LedgerError> {
        self.query(|ledger, ctx| ledger.load_account(ctx, account_id))
    }

    fn get_account_by_email(&self, email: &str) -> Result<Account, LedgerError> {
        self.query(|ledger, ctx| ledger.get_account_by_email(ctx, email))
    }

    fn account_exists(&self, account_id: &str) -> Result<bool, LedgerError> {
        self.query(|ledger, ctx| ledger.account_exists(ctx, account_id))
    }

    fn energy_balance(&self, account_id: &str) -> Result<f64, LedgerError> {
        Ok(self.get_account(account_id)?.energy_balance)
    }

    fn currency_balance(&self, account_id: &str) -> Result<f64, LedgerError> {
        Ok(self.get_account(account_id)?.currency_balance)
    }

    fn available_energy(&self, account_id: &str) -> Result<f64, LedgerError> {
        Ok(self.get_account(account_id)?.available_energy)
    }

    fn energy_status(&self, account_id: &str) -> Result<EnergyReport, LedgerError> {
        self.query(|ledger, ctx| ledger.energy_status(ctx, account_id))
    }

    fn create_trade(
        &mut self,
        trade_id: &str,
        seller_id: &str,
        buyer_id: &str,
        amount: f64,
        price_per_unit: f64,
    ) -> Result<Trade, LedgerError> {
        self.execute("create_trade", |ledger, ctx| {
            ledger.create_trade(ctx, trade_id, seller_id, buyer_id, amount, price_per_unit)
        })
    }

    fn settle_trade(&mut self, trade_id: &str) -> Result<Trade, LedgerError> {
        self.execute("settle_trade", |ledger, ctx| ledger.settle_trade(ctx, trade_id))
    }

    fn get_trade(&self, trade_id: &str) -> Result<Trade, LedgerError> {
        self.query(|ledger, ctx| ledger.load_trade(ctx, trade_id))
    }

    fn place_offer(
        &mut self,
        offer_id: &str,
        account_id: &str,
        direction: OfferDirection,
        energy_amount: f64,
        price_per_kwh: f64,
    ) -> Result<Offer, LedgerError> {
        self.execute("place_offer", |ledger, ctx| {
            ledger.place_offer(ctx, offer_id, account_id, direction, energy_amount, price_per_kwh)
        })
    }

    fn update_offer_status(&mut self, offer_id: &str, status: OfferStatus) -> Result<Offer, LedgerError> {
        self.execute("update_offer_status", |ledger, ctx| {
            ledger.update_offer_status(ctx, offer_id, status)
        })
    }

    fn get_offer(&self, offer_id: &str) -> Result<Offer, LedgerError> {
        self.query(|ledger, ctx| ledger.load_offer(ctx, offer_id))
    }

    fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        self.query(|ledger, ctx| ledger.list_accounts(ctx))
    }

    fn list_trades(&self) -> Result<Vec<Trade>, LedgerError> {
        self.query(|ledger, ctx| ledger.list_trades(ctx))
    }

    fn list_trades_for_account(&self, account_id: &str) -> Result<Vec<Trade>, LedgerError> {
        self.query(|ledger, ctx| ledger.list_trades_for_account(ctx, account_id))
    }

    fn list_active_offers(&self) -> Result<Vec<Offer>, LedgerError> {
        self.query(|ledger, ctx| ledger.list_active_offers(ctx))
    }

    fn account_history(&self, account_id: &str) -> Result<Vec<AccountHistoryEntry>, LedgerError> {
        self.query(|ledger, ctx| ledger.account_history(ctx, account_id))
    }

    fn total_supply(&self) -> Result<SupplyTotals, LedgerError> {
        self.query(|ledger, ctx| ledger.total_supply(ctx))
    }
}
