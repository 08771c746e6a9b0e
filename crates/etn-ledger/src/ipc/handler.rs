//! Invocation handler.
//!
//! Routes decoded `LedgerRequest`s to an `EnergyLedgerApi` implementation.
//! Each request maps to exactly one API call, so each mutating request is
//! exactly one committing invocation.

use super::payloads::{InvocationError, LedgerRequest, LedgerResponse};
use crate::domain::entities::OfferStatus;
use crate::domain::errors::{ErrorKind, LedgerError};
use crate::ports::inbound::EnergyLedgerApi;
use tracing::debug;

/// Dispatches invocation payloads to a ledger.
pub struct LedgerHandler<A: EnergyLedgerApi> {
    api: A,
}

impl<A: EnergyLedgerApi> LedgerHandler<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn into_inner(self) -> A {
        self.api
    }

    /// Decode one JSON request and run it.
    pub fn handle_json(&mut self, raw: &str) -> Result<LedgerResponse, InvocationError> {
        let request: LedgerRequest = serde_json::from_str(raw).map_err(|e| InvocationError {
            kind: ErrorKind::InvalidArgument,
            message: format!("malformed request: {e}"),
        })?;
        self.handle(request).map_err(InvocationError::from)
    }

    /// Run one request against the ledger.
    pub fn handle(&mut self, request: LedgerRequest) -> Result<LedgerResponse, LedgerError> {
        debug!(?request, "[etn] handling request");

        let api = &mut self.api;
        let response = match request {
            LedgerRequest::InitLedger => LedgerResponse::Count(api.init_ledger()?),
            LedgerRequest::RegisterAccount(reg) => LedgerResponse::Account(api.register_account(reg)?),
            LedgerRequest::RegisterAccountWithIdentity(reg) => {
                LedgerResponse::Account(api.register_account_with_identity(reg)?)
            }
            LedgerRequest::Mint { account_id, amount } => {
                LedgerResponse::Account(api.mint(&account_id, amount)?)
            }
            LedgerRequest::Transfer { from_id, to_id, amount } => {
                api.transfer(&from_id, &to_id, amount)?;
                LedgerResponse::Done
            }
            LedgerRequest::UpdateAvailableEnergy { account_id, value } => {
                LedgerResponse::Account(api.update_available_energy(&account_id, value)?)
            }
            LedgerRequest::UpdateDailyConsumption { account_id, value } => {
                LedgerResponse::Account(api.update_daily_consumption(&account_id, value)?)
            }
            LedgerRequest::UpdateTelemetry {
                account_id,
                current_generation,
                current_consumption,
            } => LedgerResponse::Account(api.update_telemetry(
                &account_id,
                current_generation,
                current_consumption,
            )?),
            LedgerRequest::GetAccount { account_id } => {
                LedgerResponse::Account(api.get_account(&account_id)?)
            }
            LedgerRequest::GetAccountByEmail { email } => {
                LedgerResponse::Account(api.get_account_by_email(&email)?)
            }
            LedgerRequest::AccountExists { account_id } => {
                LedgerResponse::Flag(api.account_exists(&account_id)?)
            }
            LedgerRequest::EnergyBalance { account_id } => {
                LedgerResponse::Amount(api.energy_balance(&account_id)?)
            }
            LedgerRequest::CurrencyBalance { account_id } => {
                LedgerResponse::Amount(api.currency_balance(&account_id)?)
            }
            LedgerRequest::AvailableEnergy { account_id } => {
                LedgerResponse::Amount(api.available_energy(&account_id)?)
            }
            LedgerRequest::EnergyStatus { account_id } => {
                LedgerResponse::EnergyReport(api.energy_status(&account_id)?)
            }
            LedgerRequest::CreateTrade {
                trade_id,
                seller_id,
                buyer_id,
                amount,
                price_per_unit,
            } => LedgerResponse::Trade(api.create_trade(
                &trade_id,
                &seller_id,
                &buyer_id,
                amount,
                price_per_unit,
            )?),
            LedgerRequest::SettleTrade { trade_id } => LedgerResponse::Trade(api.settle_trade(&trade_id)?),
            LedgerRequest::GetTrade { trade_id } => LedgerResponse::Trade(api.get_trade(&trade_id)?),
            LedgerRequest::PlaceOffer {
                offer_id,
                account_id,
                direction,
                energy_amount,
                price_per_kwh,
            } => LedgerResponse::Offer(api.place_offer(
                &offer_id,
                &account_id,
                direction,
                energy_amount,
                price_per_kwh,
            )?),
            LedgerRequest::UpdateOfferStatus { offer_id, status } => {
                let status: OfferStatus = status.parse()?;
                LedgerResponse::Offer(api.update_offer_status(&offer_id, status)?)
            }
            LedgerRequest::GetOffer { offer_id } => LedgerResponse::Offer(api.get_offer(&offer_id)?),
            LedgerRequest::ListActiveOffers => LedgerResponse::Offers(api.list_active_offers()?),
            LedgerRequest::ListAccounts => LedgerResponse::Accounts(api.list_accounts()?),
            LedgerRequest::ListTrades => LedgerResponse::Trades(api.list_trades()?),
            LedgerRequest::ListTradesForAccount { account_id } => {
                LedgerResponse::Trades(api.list_trades_for_account(&account_id)?)
            }
            LedgerRequest::AccountHistory { account_id } => {
                LedgerResponse::History(api.account_history(&account_id)?)
            }
            LedgerRequest::TotalSupply => LedgerResponse::Supply(api.total_supply()?),
        };
        Ok(response)
    }
}
