//! Invocation payloads.
//!
//! One request variant per ledger operation, carrying only primitive, string
//! and numeric arguments. Requests and responses are JSON documents of the form
//! `{"function": "Transfer", "args": {"fromId": "A", "toId": "B", "amount": 10}}`.

use crate::domain::energy::EnergyReport;
use crate::domain::entities::{
    Account, AccountHistoryEntry, AccountRegistration, IdentityRegistration, Offer,
    OfferDirection, Trade,
};
use crate::domain::errors::{ErrorKind, LedgerError};
use crate::domain::supply::SupplyTotals;
use serde::{Deserialize, Serialize};

// ============================================================
// REQUEST PAYLOADS
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "function", content = "args", rename_all_fields = "camelCase")]
pub enum LedgerRequest {
    InitLedger,
    RegisterAccount(AccountRegistration),
    RegisterAccountWithIdentity(IdentityRegistration),
    Mint {
        account_id: String,
        amount: f64,
    },
    Transfer {
        from_id: String,
        to_id: String,
        amount: f64,
    },
    UpdateAvailableEnergy {
        account_id: String,
        value: f64,
    },
    UpdateDailyConsumption {
        account_id: String,
        value: f64,
    },
    UpdateTelemetry {
        account_id: String,
        current_generation: f64,
        current_consumption: f64,
    },
    GetAccount {
        account_id: String,
    },
    GetAccountByEmail {
        email: String,
    },
    AccountExists {
        account_id: String,
    },
    EnergyBalance {
        account_id: String,
    },
    CurrencyBalance {
        account_id: String,
    },
    AvailableEnergy {
        account_id: String,
    },
    EnergyStatus {
        account_id: String,
    },
    CreateTrade {
        trade_id: String,
        seller_id: String,
        buyer_id: String,
        amount: f64,
        price_per_unit: f64,
    },
    SettleTrade {
        trade_id: String,
    },
    GetTrade {
        trade_id: String,
    },
    PlaceOffer {
        offer_id: String,
        account_id: String,
        #[serde(rename = "offerType")]
        direction: OfferDirection,
        energy_amount: f64,
        price_per_kwh: f64,
    },
    /// The status arrives as a raw tag so an unknown value is reported as
    /// `InvalidArgument` rather than as a malformed request.
    UpdateOfferStatus {
        offer_id: String,
        status: String,
    },
    GetOffer {
        offer_id: String,
    },
    ListActiveOffers,
    ListAccounts,
    ListTrades,
    ListTradesForAccount {
        account_id: String,
    },
    AccountHistory {
        account_id: String,
    },
    TotalSupply,
}

impl LedgerRequest {
    /// Whether the request goes through a committing invocation.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            LedgerRequest::InitLedger
                | LedgerRequest::RegisterAccount(_)
                | LedgerRequest::RegisterAccountWithIdentity(_)
                | LedgerRequest::Mint { .. }
                | LedgerRequest::Transfer { .. }
                | LedgerRequest::UpdateAvailableEnergy { .. }
                | LedgerRequest::UpdateDailyConsumption { .. }
                | LedgerRequest::UpdateTelemetry { .. }
                | LedgerRequest::CreateTrade { .. }
                | LedgerRequest::SettleTrade { .. }
                | LedgerRequest::PlaceOffer { .. }
                | LedgerRequest::UpdateOfferStatus { .. }
        )
    }
}

// ============================================================
// RESPONSE PAYLOADS
// ============================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum LedgerResponse {
    Done,
    Count(usize),
    Flag(bool),
    Amount(f64),
    Account(Account),
    Accounts(Vec<Account>),
    Trade(Trade),
    Trades(Vec<Trade>),
    Offer(Offer),
    Offers(Vec<Offer>),
    EnergyReport(EnergyReport),
    History(Vec<AccountHistoryEntry>),
    Supply(SupplyTotals),
}

/// Failure as reported to the invoking layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvocationError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&LedgerError> for InvocationError {
    fn from(err: &LedgerError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

impl From<LedgerError> for InvocationError {
    fn from(err: LedgerError) -> Self {
        Self::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_json_shape() {
        let request: LedgerRequest = serde_json::from_str(
            r#"{"function":"Transfer","args":{"fromId":"A","toId":"B","amount":10.5}}"#,
        )
        .unwrap();
        assert_eq!(
            request,
            LedgerRequest::Transfer {
                from_id: "A".into(),
                to_id: "B".into(),
                amount: 10.5,
            }
        );
        assert!(request.is_mutating());
    }

    #[test]
    fn test_unit_requests_need_no_args() {
        let request: LedgerRequest = serde_json::from_str(r#"{"function":"ListAccounts"}"#).unwrap();
        assert_eq!(request, LedgerRequest::ListAccounts);
        assert!(!request.is_mutating());
    }

    #[test]
    fn test_place_offer_uses_offer_type_field() {
        let request: LedgerRequest = serde_json::from_str(
            r#"{"function":"PlaceOffer","args":{"offerId":"O1","accountId":"A","offerType":"sell","energyAmount":5,"pricePerKwh":0.2}}"#,
        )
        .unwrap();
        assert!(matches!(
            request,
            LedgerRequest::PlaceOffer { direction: OfferDirection::Sell, .. }
        ));
    }

    #[test]
    fn test_error_payload_carries_kind_and_message() {
        let err = LedgerError::AlreadyCompleted { trade_id: "T1".into() };
        let payload = InvocationError::from(&err);
        assert_eq!(payload.kind, ErrorKind::AlreadyCompleted);
        assert_eq!(payload.message, "trade T1 is already completed");
    }
}
