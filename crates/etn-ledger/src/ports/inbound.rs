//! # Inbound Ports (Driving Ports)
//!
//! The primary API of the energy ledger.
//!
//! Every mutating call is one invocation: it either commits all of its writes
//! or leaves the world state exactly as it was. Queries never write.

use crate::domain::energy::EnergyReport;
use crate::domain::entities::{
    Account, AccountHistoryEntry, AccountRegistration, IdentityRegistration, Offer,
    OfferDirection, OfferStatus, Trade,
};
use crate::domain::errors::LedgerError;
use crate::domain::supply::SupplyTotals;

/// Primary API of the energy ledger.
pub trait EnergyLedgerApi {
    // =========================================================================
    // ACCOUNT LEDGER
    // =========================================================================

    /// Seed the configured genesis accounts.
    ///
    /// ## Errors
    ///
    /// - `AlreadyExists`: any genesis id is already registered (nothing is written)
    fn init_ledger(&mut self) -> Result<usize, LedgerError>;

    /// Register a plain account.
    ///
    /// ## Errors
    ///
    /// - `AlreadyExists`: the id is taken
    /// - `InvalidArgument`: empty id or negative initial figures
    fn register_account(&mut self, reg: AccountRegistration) -> Result<Account, LedgerError>;

    /// Register an account and claim its email and fiscal id.
    ///
    /// ## Errors
    ///
    /// - `AlreadyExists`: the id, the email or the fiscal id is taken
    fn register_account_with_identity(
        &mut self,
        reg: IdentityRegistration,
    ) -> Result<Account, LedgerError>;

    /// Create `amount` energy tokens on an account.
    fn mint(&mut self, account_id: &str, amount: f64) -> Result<Account, LedgerError>;

    /// Move energy tokens between two distinct accounts.
    ///
    /// ## Errors
    ///
    /// - `InsufficientBalance`: the sender holds less than `amount`
    /// - `InvalidArgument`: non-positive amount or `from == to`
    fn transfer(&mut self, from_id: &str, to_id: &str, amount: f64) -> Result<(), LedgerError>;

    fn update_available_energy(&mut self, account_id: &str, value: f64) -> Result<Account, LedgerError>;

    fn update_daily_consumption(&mut self, account_id: &str, value: f64) -> Result<Account, LedgerError>;

    /// Record live generation and consumption readings.
    fn update_telemetry(
        &mut self,
        account_id: &str,
        current_generation: f64,
        current_consumption: f64,
    ) -> Result<Account, LedgerError>;

    fn get_account(&self, account_id: &str) -> Result<Account, LedgerError>;

    fn get_account_by_email(&self, email: &str) -> Result<Account, LedgerError>;

    fn account_exists(&self, account_id: &str) -> Result<bool, LedgerError>;

    fn energy_balance(&self, account_id: &str) -> Result<f64, LedgerError>;

    fn currency_balance(&self, account_id: &str) -> Result<f64, LedgerError>;

    fn available_energy(&self, account_id: &str) -> Result<f64, LedgerError>;

    fn energy_status(&self, account_id: &str) -> Result<EnergyReport, LedgerError>;

    // =========================================================================
    // TRADE SETTLEMENT
    // =========================================================================

    /// Record a pending trade. Balances are not checked here.
    fn create_trade(
        &mut self,
        trade_id: &str,
        seller_id: &str,
        buyer_id: &str,
        amount: f64,
        price_per_unit: f64,
    ) -> Result<Trade, LedgerError>;

    /// Settle a pending trade: energy to the buyer, currency to the seller.
    ///
    /// ## Errors
    ///
    /// - `AlreadyCompleted`: the trade was settled before
    /// - `InsufficientBalance`: buyer currency or seller energy falls short
    fn settle_trade(&mut self, trade_id: &str) -> Result<Trade, LedgerError>;

    fn get_trade(&self, trade_id: &str) -> Result<Trade, LedgerError>;

    // =========================================================================
    // OFFER BOOK
    // =========================================================================

    fn place_offer(
        &mut self,
        offer_id: &str,
        account_id: &str,
        direction: OfferDirection,
        energy_amount: f64,
        price_per_kwh: f64,
    ) -> Result<Offer, LedgerError>;

    fn update_offer_status(&mut self, offer_id: &str, status: OfferStatus) -> Result<Offer, LedgerError>;

    fn get_offer(&self, offer_id: &str) -> Result<Offer, LedgerError>;

    // =========================================================================
    // QUERY LAYER
    // =========================================================================

    fn list_accounts(&self) -> Result<Vec<Account>, LedgerError>;

    fn list_trades(&self) -> Result<Vec<Trade>, LedgerError>;

    /// Trades where the account is seller or buyer.
    fn list_trades_for_account(&self, account_id: &str) -> Result<Vec<Trade>, LedgerError>;

    /// Offers whose status is currently `active`.
    fn list_active_offers(&self) -> Result<Vec<Offer>, LedgerError>;

    /// Every committed write to an account, oldest first.
    fn account_history(&self, account_id: &str) -> Result<Vec<AccountHistoryEntry>, LedgerError>;

    fn total_supply(&self) -> Result<SupplyTotals, LedgerError>;
}
