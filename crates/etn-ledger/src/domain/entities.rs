//! # Domain Entities
//!
//! Ledger records: factory accounts, energy trades, marketplace offers and
//! uniqueness index entries.
//!
//! ## Encoding
//!
//! Field names serialize in camelCase and optional identity fields are omitted
//! when absent, so a stored record only carries what was actually set.
//!
//! ## Balance Invariant
//!
//! Energy and currency balances never go below zero. The only way to move them
//! down is through `debit_energy` / `debit_currency`, which refuse to overdraw.

use crate::domain::errors::{Asset, LedgerError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Invocation timestamp as recorded on ledger records.
pub type Timestamp = DateTime<Utc>;

// =============================================================================
// ACCOUNT
// =============================================================================

/// A factory account holding an energy-token and a currency-token balance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique account identifier (e.g. `Factory01`).
    pub id: String,
    /// Display name.
    pub name: String,
    /// Energy tokens held, in kWh.
    pub energy_balance: f64,
    /// Declared energy source (solar, wind, footstep, ...).
    pub energy_type: String,
    /// Currency tokens held.
    pub currency_balance: f64,
    /// Daily energy consumption in kWh.
    pub daily_consumption: f64,
    /// Currently available energy in kWh.
    pub available_energy: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiscal_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_capacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_info: Option<String>,
    /// Live generation telemetry in kW.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_generation: Option<f64>,
    /// Live consumption telemetry in kW.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_consumption: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
}

impl Account {
    /// Build a plain account (no identity fields) from a registration request.
    pub fn from_registration(reg: &AccountRegistration, created_at: Timestamp) -> Self {
        Self {
            id: reg.id.clone(),
            name: reg.name.clone(),
            energy_balance: reg.initial_energy,
            energy_type: reg.energy_type.clone(),
            currency_balance: reg.initial_currency,
            daily_consumption: reg.daily_consumption,
            available_energy: reg.available_energy,
            email: None,
            credential_hash: None,
            location: None,
            fiscal_id: None,
            energy_capacity: None,
            contact_info: None,
            current_generation: None,
            current_consumption: None,
            created_at: Some(created_at),
        }
    }

    /// Build an account carrying identity fields.
    ///
    /// Daily consumption starts at zero and available energy mirrors the
    /// initial energy balance; telemetry starts at zero.
    pub fn from_identity(reg: &IdentityRegistration, created_at: Timestamp) -> Self {
        Self {
            id: reg.id.clone(),
            name: reg.name.clone(),
            energy_balance: reg.initial_energy,
            energy_type: reg.energy_type.clone(),
            currency_balance: reg.initial_currency,
            daily_consumption: 0.0,
            available_energy: reg.initial_energy,
            email: Some(reg.email.clone()),
            credential_hash: Some(reg.credential_hash.clone()),
            location: Some(reg.location.clone()),
            fiscal_id: Some(reg.fiscal_id.clone()),
            energy_capacity: Some(reg.energy_capacity),
            contact_info: Some(reg.contact_info.clone()),
            current_generation: Some(0.0),
            current_consumption: Some(0.0),
            created_at: Some(created_at),
        }
    }

    /// Remove energy tokens, refusing to overdraw.
    pub fn debit_energy(&mut self, amount: f64) -> Result<(), LedgerError> {
        if self.energy_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account_id: self.id.clone(),
                asset: Asset::Energy,
                available: self.energy_balance,
                required: amount,
            });
        }
        self.energy_balance -= amount;
        Ok(())
    }

    /// Add energy tokens; a sum that leaves the finite range is rejected.
    pub fn credit_energy(&mut self, amount: f64) -> Result<(), LedgerError> {
        self.energy_balance = checked_credit(&self.id, Asset::Energy, self.energy_balance, amount)?;
        Ok(())
    }

    /// Remove currency tokens, refusing to overdraw.
    pub fn debit_currency(&mut self, amount: f64) -> Result<(), LedgerError> {
        if self.currency_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account_id: self.id.clone(),
                asset: Asset::Currency,
                available: self.currency_balance,
                required: amount,
            });
        }
        self.currency_balance -= amount;
        Ok(())
    }

    pub fn credit_currency(&mut self, amount: f64) -> Result<(), LedgerError> {
        self.currency_balance =
            checked_credit(&self.id, Asset::Currency, self.currency_balance, amount)?;
        Ok(())
    }
}

fn checked_credit(account_id: &str, asset: Asset, balance: f64, amount: f64) -> Result<f64, LedgerError> {
    let credited = balance + amount;
    if !credited.is_finite() {
        return Err(LedgerError::invalid(format!(
            "crediting {amount} {asset} to {account_id} overflows its balance of {balance}"
        )));
    }
    Ok(credited)
}

/// Arguments of a plain account registration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRegistration {
    pub id: String,
    pub name: String,
    pub initial_energy: f64,
    pub energy_type: String,
    pub initial_currency: f64,
    pub daily_consumption: f64,
    pub available_energy: f64,
}

/// Arguments of a registration that also claims an email and a fiscal id.
///
/// `Debug` redacts the credential hash.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityRegistration {
    pub id: String,
    pub name: String,
    pub email: String,
    pub credential_hash: String,
    pub location: String,
    pub fiscal_id: String,
    pub energy_capacity: f64,
    pub contact_info: String,
    pub energy_type: String,
    pub initial_energy: f64,
    pub initial_currency: f64,
}

impl fmt::Debug for IdentityRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityRegistration")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("credential_hash", &"<redacted>")
            .field("location", &self.location)
            .field("fiscal_id", &self.fiscal_id)
            .field("energy_capacity", &self.energy_capacity)
            .field("contact_info", &self.contact_info)
            .field("energy_type", &self.energy_type)
            .field("initial_energy", &self.initial_energy)
            .field("initial_currency", &self.initial_currency)
            .finish()
    }
}

// =============================================================================
// TRADE
// =============================================================================

/// Lifecycle status of a trade.
///
/// Only `Pending -> Completed` is reachable through the ledger. `Cancelled`
/// is part of the record format so a cancellation operation can be added
/// without migrating stored trades.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeStatus {
    Pending,
    Completed,
    Cancelled,
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TradeStatus::Pending => "pending",
            TradeStatus::Completed => "completed",
            TradeStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// An energy trade between a selling and a buying account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    pub trade_id: String,
    pub seller_id: String,
    pub buyer_id: String,
    /// Energy amount in kWh.
    pub amount: f64,
    /// Price per kWh in currency tokens.
    pub price_per_unit: f64,
    /// `amount * price_per_unit`, fixed at creation.
    pub total_price: f64,
    pub timestamp: Timestamp,
    pub status: TradeStatus,
}

impl Trade {
    /// Create a pending trade; the total price is computed once here.
    pub fn new(
        trade_id: impl Into<String>,
        seller_id: impl Into<String>,
        buyer_id: impl Into<String>,
        amount: f64,
        price_per_unit: f64,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            trade_id: trade_id.into(),
            seller_id: seller_id.into(),
            buyer_id: buyer_id.into(),
            amount,
            price_per_unit,
            total_price: amount * price_per_unit,
            timestamp,
            status: TradeStatus::Pending,
        }
    }

    pub fn involves(&self, account_id: &str) -> bool {
        self.seller_id == account_id || self.buyer_id == account_id
    }
}

// =============================================================================
// OFFER
// =============================================================================

/// Whether an offer wants to buy or sell energy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferDirection {
    Buy,
    Sell,
}

impl fmt::Display for OfferDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OfferDirection::Buy => "buy",
            OfferDirection::Sell => "sell",
        })
    }
}

impl FromStr for OfferDirection {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(OfferDirection::Buy),
            "sell" => Ok(OfferDirection::Sell),
            other => Err(LedgerError::invalid(format!(
                "unknown offer direction '{other}' (expected buy or sell)"
            ))),
        }
    }
}

/// Offer status. Any tag may replace any other through an explicit update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    Active,
    Completed,
    Cancelled,
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OfferStatus::Active => "active",
            OfferStatus::Completed => "completed",
            OfferStatus::Cancelled => "cancelled",
        })
    }
}

impl FromStr for OfferStatus {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(OfferStatus::Active),
            "completed" => Ok(OfferStatus::Completed),
            "cancelled" => Ok(OfferStatus::Cancelled),
            other => Err(LedgerError::invalid(format!(
                "unknown offer status '{other}' (expected active, completed or cancelled)"
            ))),
        }
    }
}

/// A standalone buy/sell intent, independent of the trade lifecycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    pub id: String,
    pub account_id: String,
    #[serde(rename = "offerType")]
    pub direction: OfferDirection,
    pub energy_amount: f64,
    pub price_per_kwh: f64,
    pub status: OfferStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// =============================================================================
// UNIQUENESS INDEX
// =============================================================================

/// Identity attribute that must be unique across accounts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IndexAttribute {
    Email,
    FiscalId,
}

impl fmt::Display for IndexAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IndexAttribute::Email => "email",
            IndexAttribute::FiscalId => "fiscal id",
        })
    }
}

/// Secondary key pointing at the account that claimed an attribute value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub attribute: IndexAttribute,
    pub value: String,
    pub account_id: String,
}

// =============================================================================
// HISTORY
// =============================================================================

/// One historical write to an account key, as reported by the world state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountHistoryEntry {
    pub tx_id: String,
    /// Account snapshot written by that invocation; `None` for deletions.
    pub account: Option<Account>,
    pub timestamp: Timestamp,
    pub is_delete: bool,
}
