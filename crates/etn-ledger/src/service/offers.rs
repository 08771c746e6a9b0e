//! # Offer Book
//!
//! Standalone buy/sell intents. Offers reference an account but never move
//! balances.

use super::context::TxContext;
use super::EnergyLedger;
use crate::domain::entities::{Offer, OfferDirection, OfferStatus};
use crate::domain::errors::{LedgerError, RecordKind};
use crate::domain::keys::KeyPrefix;
use crate::domain::validation::{require_id, require_non_negative, require_positive};
use crate::ports::outbound::WorldState;
use tracing::info;

impl EnergyLedger {
    pub fn load_offer<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        offer_id: &str,
    ) -> Result<Offer, LedgerError> {
        ctx.get_record(&KeyPrefix::offer_key(offer_id))?
            .ok_or_else(|| LedgerError::not_found(RecordKind::Offer, offer_id))
    }

    /// Place an active offer. Created and updated timestamps start equal.
    pub fn place_offer<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        offer_id: &str,
        account_id: &str,
        direction: OfferDirection,
        energy_amount: f64,
        price_per_kwh: f64,
    ) -> Result<Offer, LedgerError> {
        require_id("offer id", offer_id)?;
        require_positive("offer amount", energy_amount)?;
        require_non_negative("price per kWh", price_per_kwh)?;

        self.load_account(ctx, account_id)?;

        let key = KeyPrefix::offer_key(offer_id);
        if ctx.exists(&key)? {
            return Err(LedgerError::already_exists(RecordKind::Offer, offer_id));
        }

        let now = ctx.timestamp();
        let offer = Offer {
            id: offer_id.to_string(),
            account_id: account_id.to_string(),
            direction,
            energy_amount,
            price_per_kwh,
            status: OfferStatus::Active,
            created_at: now,
            updated_at: now,
        };
        ctx.put_record(key, &offer)?;

        info!(
            tx = ctx.tx_id(),
            offer = offer_id,
            account = account_id,
            direction = %direction,
            "[etn] offer placed"
        );
        Ok(offer)
    }

    /// Replace an offer's status. Any tag may replace any other.
    pub fn update_offer_status<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        offer_id: &str,
        status: OfferStatus,
    ) -> Result<Offer, LedgerError> {
        let mut offer = self.load_offer(ctx, offer_id)?;
        let previous = offer.status;

        offer.status = status;
        offer.updated_at = ctx.timestamp();
        ctx.put_record(KeyPrefix::offer_key(offer_id), &offer)?;

        info!(
            tx = ctx.tx_id(),
            offer = offer_id,
            from = %previous,
            to = %status,
            "[etn] offer status updated"
        );
        Ok(offer)
    }
}
