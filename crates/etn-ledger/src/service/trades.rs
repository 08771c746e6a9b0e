//! # Trade Settlement
//!
//! Trade lifecycle: `pending -> completed`.
//!
//! Settlement runs as sequential read-validate-write phases inside one
//! invocation context. Each phase reloads the accounts it touches, so it sees
//! the balances produced by the phase before it rather than a snapshot taken
//! when settlement started. Because every write is buffered in the context, a
//! failure in any phase discards the whole settlement.

use super::context::TxContext;
use super::EnergyLedger;
use crate::domain::entities::{Trade, TradeStatus};
use crate::domain::errors::{Asset, LedgerError, RecordKind};
use crate::domain::keys::KeyPrefix;
use crate::domain::validation::{
    require_distinct, require_finite_product, require_id, require_non_negative, require_positive,
};
use crate::ports::outbound::WorldState;
use tracing::{info, instrument};

impl EnergyLedger {
    pub fn load_trade<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        trade_id: &str,
    ) -> Result<Trade, LedgerError> {
        ctx.get_record(&KeyPrefix::trade_key(trade_id))?
            .ok_or_else(|| LedgerError::not_found(RecordKind::Trade, trade_id))
    }

    fn store_trade<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        trade: &Trade,
    ) -> Result<(), LedgerError> {
        ctx.put_record(KeyPrefix::trade_key(&trade.trade_id), trade)
    }

    /// Record a pending trade.
    ///
    /// The seller's energy balance is checked here, and again at settlement.
    #[instrument(skip(self, ctx), fields(tx = ctx.tx_id()))]
    pub fn create_trade<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        trade_id: &str,
        seller_id: &str,
        buyer_id: &str,
        amount: f64,
        price_per_unit: f64,
    ) -> Result<Trade, LedgerError> {
        require_id("trade id", trade_id)?;
        require_positive("trade amount", amount)?;
        require_non_negative("price per unit", price_per_unit)?;
        require_distinct("seller", seller_id, "buyer", buyer_id)?;
        require_finite_product("total price", amount, price_per_unit)?;

        if ctx.exists(&KeyPrefix::trade_key(trade_id))? {
            return Err(LedgerError::already_exists(RecordKind::Trade, trade_id));
        }

        let seller = self.load_account(ctx, seller_id)?;
        self.load_account(ctx, buyer_id)?;

        if seller.energy_balance < amount {
            return Err(LedgerError::InsufficientBalance {
                account_id: seller.id,
                asset: Asset::Energy,
                available: seller.energy_balance,
                required: amount,
            });
        }

        let trade = Trade::new(
            trade_id,
            seller_id,
            buyer_id,
            amount,
            price_per_unit,
            ctx.timestamp(),
        );
        self.store_trade(ctx, &trade)?;

        info!(
            trade = trade_id,
            total_price = trade.total_price,
            "[etn] trade created"
        );
        Ok(trade)
    }

    /// Settle a pending trade.
    ///
    /// Phases, each against the freshest buffered state:
    /// 1. load the trade and reject completed or cancelled trades
    /// 2. check the buyer can pay the total price
    /// 3. move energy seller -> buyer (re-validates the seller balance)
    /// 4. move currency buyer -> seller (re-validates the buyer balance)
    /// 5. mark the trade completed
    #[instrument(skip(self, ctx), fields(tx = ctx.tx_id()))]
    pub fn settle_trade<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        trade_id: &str,
    ) -> Result<Trade, LedgerError> {
        let mut trade = self.load_trade(ctx, trade_id)?;
        match trade.status {
            TradeStatus::Pending => {}
            TradeStatus::Completed => {
                return Err(LedgerError::AlreadyCompleted {
                    trade_id: trade.trade_id,
                })
            }
            TradeStatus::Cancelled => {
                return Err(LedgerError::invalid(format!(
                    "trade {trade_id} is cancelled and cannot be settled"
                )))
            }
        }

        let buyer = self.load_account(ctx, &trade.buyer_id)?;
        if buyer.currency_balance < trade.total_price {
            return Err(LedgerError::InsufficientBalance {
                account_id: buyer.id,
                asset: Asset::Currency,
                available: buyer.currency_balance,
                required: trade.total_price,
            });
        }

        self.transfer(ctx, &trade.seller_id, &trade.buyer_id, trade.amount)?;
        self.settle_currency_leg(ctx, &trade)?;

        trade.status = TradeStatus::Completed;
        self.store_trade(ctx, &trade)?;

        info!(
            trade = trade_id,
            seller = %trade.seller_id,
            buyer = %trade.buyer_id,
            amount = trade.amount,
            total_price = trade.total_price,
            "[etn] trade settled"
        );
        Ok(trade)
    }

    /// Move the trade's total price from buyer to seller.
    ///
    /// Both accounts are reloaded so the energy leg's writes are observed.
    pub(crate) fn settle_currency_leg<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        trade: &Trade,
    ) -> Result<(), LedgerError> {
        let mut buyer = self.load_account(ctx, &trade.buyer_id)?;
        let mut seller = self.load_account(ctx, &trade.seller_id)?;

        buyer.debit_currency(trade.total_price)?;
        seller.credit_currency(trade.total_price)?;

        self.store_account(ctx, &buyer)?;
        self.store_account(ctx, &seller)?;
        Ok(())
    }
}
