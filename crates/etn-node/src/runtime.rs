//! # Ledger Node
//!
//! Hosts one `LedgerService` over any world state and feeds it JSON
//! invocations, one at a time, in the order they arrive. Ordering and
//! replication are the job of whatever produces the invocation stream.

use anyhow::{Context, Result};
use etn_ledger::{
    EnergyLedgerApi, InvocationError, LedgerConfig, LedgerError, LedgerHandler, LedgerRequest,
    LedgerResponse, LedgerService, SystemTimeSource, WorldState,
};
use serde_json::{json, Value};
use std::io::{BufRead, Write};
use tracing::{info, warn};

/// Outcome counts of a replayed invocation stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub succeeded: usize,
    pub failed: usize,
}

/// A ledger bound to a world state, driven by JSON invocations.
pub struct LedgerNode<S: WorldState> {
    handler: LedgerHandler<LedgerService<S, SystemTimeSource>>,
    token_symbol: String,
}

impl<S: WorldState> LedgerNode<S> {
    pub fn new(state: S, config: LedgerConfig) -> Self {
        let token_symbol = config.token_symbol.clone();
        Self {
            handler: LedgerHandler::new(LedgerService::new(state, SystemTimeSource, config)),
            token_symbol,
        }
    }

    pub fn ledger(&self) -> &LedgerService<S, SystemTimeSource> {
        self.handler.api()
    }

    /// Run one decoded invocation and render the outcome as a JSON envelope.
    pub fn exec(&mut self, request: LedgerRequest) -> Value {
        envelope(self.handler.handle(request).map_err(InvocationError::from))
    }

    /// Run one JSON invocation and render the outcome as a JSON envelope.
    pub fn exec_line(&mut self, raw: &str) -> Value {
        envelope(self.handler.handle_json(raw))
    }

    /// Run a stream of invocations, one JSON document per line.
    ///
    /// Blank lines and lines starting with `#` are skipped. A failed invocation
    /// is reported and the stream continues.
    pub fn replay<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<ReplaySummary> {
        let mut summary = ReplaySummary::default();

        for (index, line) in input.lines().enumerate() {
            let line = line.with_context(|| format!("failed to read invocation {}", index + 1))?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let outcome = self.handler.handle_json(trimmed);
            match &outcome {
                Ok(_) => summary.succeeded += 1,
                Err(e) => {
                    warn!(line = index + 1, kind = ?e.kind, "[etn] invocation failed: {}", e.message);
                    summary.failed += 1;
                }
            }
            writeln!(output, "{}", envelope(outcome)).context("failed to write result")?;
        }

        info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            "[etn] replay finished"
        );
        Ok(summary)
    }

    /// Human-readable position of one account.
    pub fn status_report(&self, account_id: &str) -> Result<String, LedgerError> {
        let ledger = self.ledger();
        let account = ledger.get_account(account_id)?;
        let report = ledger.energy_status(account_id)?;

        Ok(format!(
            "{} ({})\n  energy balance:    {:.2} kWh\n  currency balance:  {:.2} {}\n  available energy:  {:.2} kWh\n  daily consumption: {:.2} kWh\n  position:          {} ({:+.2} kWh)",
            account.name,
            account.id,
            account.energy_balance,
            account.currency_balance,
            self.token_symbol,
            report.available_energy,
            report.daily_consumption,
            report.status,
            report.difference,
        ))
    }

    /// One-line audit of total energy and currency supply.
    pub fn supply_report(&self) -> Result<String, LedgerError> {
        let supply = self.ledger().total_supply()?;
        Ok(format!(
            "{} accounts, {:.2} kWh energy, {:.2} {} currency",
            supply.accounts, supply.energy, supply.currency, self.token_symbol
        ))
    }
}

/// `{"ok": true, "result": ...}` or `{"ok": false, "error": {...}}`.
fn envelope(outcome: Result<LedgerResponse, InvocationError>) -> Value {
    match outcome {
        Ok(response) => json!({ "ok": true, "result": response }),
        Err(error) => json!({ "ok": false, "error": error }),
    }
}
