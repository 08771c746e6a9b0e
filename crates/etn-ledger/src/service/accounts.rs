//! # Account Ledger
//!
//! Factory registration, balance mutation primitives, field updates and the
//! email / fiscal-id uniqueness indices.

use super::context::TxContext;
use super::EnergyLedger;
use crate::domain::energy::EnergyReport;
use crate::domain::entities::{
    Account, AccountRegistration, IdentityRegistration, IndexAttribute, IndexEntry,
};
use crate::domain::errors::{LedgerError, RecordKind};
use crate::domain::keys::KeyPrefix;
use crate::domain::validation::{require_distinct, require_id, require_non_negative, require_positive};
use crate::ports::outbound::WorldState;
use tracing::{debug, info};

impl EnergyLedger {
    // =========================================================================
    // RECORD ACCESS
    // =========================================================================

    /// Load an account or fail with `NotFound`.
    pub fn load_account<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        id: &str,
    ) -> Result<Account, LedgerError> {
        ctx.get_record(&KeyPrefix::account_key(id))?
            .ok_or_else(|| LedgerError::not_found(RecordKind::Account, id))
    }

    pub(crate) fn store_account<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        account: &Account,
    ) -> Result<(), LedgerError> {
        ctx.put_record(KeyPrefix::account_key(&account.id), account)
    }

    fn ensure_account_absent<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        id: &str,
    ) -> Result<(), LedgerError> {
        if ctx.exists(&KeyPrefix::account_key(id))? {
            return Err(LedgerError::already_exists(RecordKind::Account, id));
        }
        Ok(())
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Seed the genesis accounts.
    ///
    /// Fails with `AlreadyExists` if any genesis id is already registered, in
    /// which case none of them is written.
    pub fn init_ledger<S: WorldState>(&self, ctx: &mut TxContext<'_, S>) -> Result<usize, LedgerError> {
        for reg in &self.config.genesis_accounts {
            self.register_account(ctx, reg)?;
        }
        info!(
            tx = ctx.tx_id(),
            accounts = self.config.genesis_accounts.len(),
            "[etn] genesis accounts seeded"
        );
        Ok(self.config.genesis_accounts.len())
    }

    /// Register a plain account with no identity fields.
    pub fn register_account<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        reg: &AccountRegistration,
    ) -> Result<Account, LedgerError> {
        require_id("account id", &reg.id)?;
        require_id("account name", &reg.name)?;
        require_non_negative("initial energy", reg.initial_energy)?;
        require_non_negative("initial currency", reg.initial_currency)?;
        require_non_negative("daily consumption", reg.daily_consumption)?;
        require_non_negative("available energy", reg.available_energy)?;

        self.ensure_account_absent(ctx, &reg.id)?;

        let account = Account::from_registration(reg, ctx.timestamp());
        self.store_account(ctx, &account)?;

        info!(tx = ctx.tx_id(), account = %account.id, "[etn] account registered");
        Ok(account)
    }

    /// Register an account together with its email and fiscal-id index entries.
    ///
    /// The id, the email and the fiscal id are each checked against their own
    /// namespace. The account and both index entries are buffered in the same
    /// context, so they commit together or not at all.
    pub fn register_account_with_identity<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        reg: &IdentityRegistration,
    ) -> Result<Account, LedgerError> {
        require_id("account id", &reg.id)?;
        require_id("account name", &reg.name)?;
        require_id("email", &reg.email)?;
        require_id("fiscal id", &reg.fiscal_id)?;
        require_non_negative("initial energy", reg.initial_energy)?;
        require_non_negative("initial currency", reg.initial_currency)?;
        require_non_negative("energy capacity", reg.energy_capacity)?;

        self.ensure_account_absent(ctx, &reg.id)?;

        let email_key = KeyPrefix::email_key(&reg.email);
        if ctx.exists(&email_key)? {
            return Err(LedgerError::already_exists(RecordKind::Email, &reg.email));
        }

        let fiscal_key = KeyPrefix::fiscal_key(&reg.fiscal_id);
        if ctx.exists(&fiscal_key)? {
            return Err(LedgerError::already_exists(RecordKind::FiscalId, &reg.fiscal_id));
        }

        let account = Account::from_identity(reg, ctx.timestamp());
        self.store_account(ctx, &account)?;
        ctx.put_record(
            email_key,
            &IndexEntry {
                attribute: IndexAttribute::Email,
                value: reg.email.clone(),
                account_id: reg.id.clone(),
            },
        )?;
        ctx.put_record(
            fiscal_key,
            &IndexEntry {
                attribute: IndexAttribute::FiscalId,
                value: reg.fiscal_id.clone(),
                account_id: reg.id.clone(),
            },
        )?;

        info!(
            tx = ctx.tx_id(),
            account = %account.id,
            "[etn] account registered with identity"
        );
        Ok(account)
    }

    // =========================================================================
    // BALANCE MUTATION
    // =========================================================================

    /// Create energy tokens. The only operation that raises total energy supply.
    pub fn mint<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        id: &str,
        amount: f64,
    ) -> Result<Account, LedgerError> {
        require_positive("mint amount", amount)?;

        let mut account = self.load_account(ctx, id)?;
        account.credit_energy(amount)?;
        self.store_account(ctx, &account)?;

        info!(tx = ctx.tx_id(), account = id, amount, "[etn] energy minted");
        Ok(account)
    }

    /// Move energy tokens between two accounts. Total supply is unchanged.
    pub fn transfer<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        from_id: &str,
        to_id: &str,
        amount: f64,
    ) -> Result<(), LedgerError> {
        require_positive("transfer amount", amount)?;
        require_distinct("sender", from_id, "receiver", to_id)?;

        let mut from = self.load_account(ctx, from_id)?;
        let mut to = self.load_account(ctx, to_id)?;

        from.debit_energy(amount)?;
        to.credit_energy(amount)?;

        self.store_account(ctx, &from)?;
        self.store_account(ctx, &to)?;

        debug!(tx = ctx.tx_id(), from = from_id, to = to_id, amount, "[etn] energy transferred");
        Ok(())
    }

    // =========================================================================
    // FIELD UPDATES
    // =========================================================================

    pub fn update_available_energy<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        id: &str,
        available_energy: f64,
    ) -> Result<Account, LedgerError> {
        require_non_negative("available energy", available_energy)?;

        let mut account = self.load_account(ctx, id)?;
        account.available_energy = available_energy;
        self.store_account(ctx, &account)?;
        Ok(account)
    }

    pub fn update_daily_consumption<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        id: &str,
        daily_consumption: f64,
    ) -> Result<Account, LedgerError> {
        require_non_negative("daily consumption", daily_consumption)?;

        let mut account = self.load_account(ctx, id)?;
        account.daily_consumption = daily_consumption;
        self.store_account(ctx, &account)?;
        Ok(account)
    }

    /// Record live generation / consumption readings. Balances are not touched.
    pub fn update_telemetry<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        id: &str,
        current_generation: f64,
        current_consumption: f64,
    ) -> Result<Account, LedgerError> {
        require_non_negative("current generation", current_generation)?;
        require_non_negative("current consumption", current_consumption)?;

        let mut account = self.load_account(ctx, id)?;
        account.current_generation = Some(current_generation);
        account.current_consumption = Some(current_consumption);
        self.store_account(ctx, &account)?;
        Ok(account)
    }

    // =========================================================================
    // LOOKUPS
    // =========================================================================

    pub fn account_exists<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        id: &str,
    ) -> Result<bool, LedgerError> {
        ctx.exists(&KeyPrefix::account_key(id))
    }

    /// Resolve an account through the email index.
    pub fn get_account_by_email<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        email: &str,
    ) -> Result<Account, LedgerError> {
        let entry: IndexEntry = ctx
            .get_record(&KeyPrefix::email_key(email))?
            .ok_or_else(|| LedgerError::not_found(RecordKind::Email, email))?;
        self.load_account(ctx, &entry.account_id)
    }

    /// Surplus/deficit position of an account.
    pub fn energy_status<S: WorldState>(
        &self,
        ctx: &mut TxContext<'_, S>,
        id: &str,
    ) -> Result<EnergyReport, LedgerError> {
        let account = self.load_account(ctx, id)?;
        Ok(EnergyReport::for_account(&account))
    }
}
