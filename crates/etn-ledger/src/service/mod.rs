//! # Ledger Service
//!
//! Two layers:
//!
//! - `EnergyLedger` is stateless. Every operation takes the invocation context
//!   as an explicit parameter and only reads and buffers writes through it.
//! - `LedgerService` owns the world state. It opens one `TxContext` per call,
//!   runs one `EnergyLedger` operation in it and commits the buffered batch only
//!   if the operation succeeded. It implements `EnergyLedgerApi`.

mod accounts;
mod api;
pub mod context;
mod offers;
mod queries;
mod trades;

use crate::adapters::memory::InMemoryWorldState;
use crate::domain::errors::LedgerError;
use crate::domain::value_objects::LedgerConfig;
use crate::ports::outbound::{SystemTimeSource, TimeSource, WorldState};
use context::TxContext;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Ledger operations over an explicit invocation context.
#[derive(Debug, Clone, Default)]
pub struct EnergyLedger {
    pub(crate) config: LedgerConfig,
}

impl EnergyLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }
}

/// The ledger bound to a world state and a clock.
pub struct LedgerService<S, T>
where
    S: WorldState,
    T: TimeSource,
{
    pub(crate) state: S,
    pub(crate) time_source: T,
    pub(crate) ledger: EnergyLedger,
}

impl<S, T> LedgerService<S, T>
where
    S: WorldState,
    T: TimeSource,
{
    pub fn new(state: S, time_source: T, config: LedgerConfig) -> Self {
        Self {
            state,
            time_source,
            ledger: EnergyLedger::new(config),
        }
    }

    pub fn ledger(&self) -> &EnergyLedger {
        &self.ledger
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn into_state(self) -> S {
        self.state
    }

    /// Run one mutating operation as one invocation.
    ///
    /// The operation's writes reach the world state only if it returns `Ok` and
    /// the read set still validates at commit time.
    pub fn execute<R, F>(&mut self, operation: &'static str, f: F) -> Result<R, LedgerError>
    where
        F: FnOnce(&EnergyLedger, &mut TxContext<'_, S>) -> Result<R, LedgerError>,
    {
        let tx_id = Uuid::new_v4().to_string();
        let timestamp = self.time_source.now();

        let mut ctx = TxContext::new(&self.state, tx_id.as_str(), timestamp);
        let result = match f(&self.ledger, &mut ctx) {
            Ok(result) => result,
            Err(e) => {
                debug!(tx = %tx_id, operation, error = %e, "[etn] invocation rejected");
                return Err(e);
            }
        };

        let batch = ctx.into_batch();
        if batch.is_read_only() {
            return Ok(result);
        }

        let writes = batch.writes.len();
        if let Err(e) = self.state.commit(batch) {
            warn!(tx = %tx_id, operation, error = %e, "[etn] commit rejected");
            return Err(e.into());
        }

        info!(tx = %tx_id, operation, writes, "[etn] invocation committed");
        Ok(result)
    }

    /// Run a read-only operation. Nothing is committed.
    pub fn query<R, F>(&self, f: F) -> Result<R, LedgerError>
    where
        F: FnOnce(&EnergyLedger, &mut TxContext<'_, S>) -> Result<R, LedgerError>,
    {
        let mut ctx = TxContext::new(&self.state, Uuid::new_v4().to_string(), self.time_source.now());
        f(&self.ledger, &mut ctx)
    }
}

impl LedgerService<InMemoryWorldState, SystemTimeSource> {
    /// Service over a fresh in-memory world state.
    pub fn in_memory(config: LedgerConfig) -> Self {
        Self::new(InMemoryWorldState::new(), SystemTimeSource, config)
    }
}
