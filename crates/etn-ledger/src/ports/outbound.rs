//! # Outbound Ports (Driven Ports)
//!
//! Dependencies the ledger requires the host application to implement.
//!
//! Production: `RocksDbWorldState` (etn-node/adapters/storage/rocksdb_adapter.rs)
//! Testing: `InMemoryWorldState` (adapters/memory.rs)

use crate::domain::entities::Timestamp;
use crate::domain::errors::StoreError;

/// Monotonic per-key version assigned by the world state on every commit.
pub type Version = u64;

/// A stored value together with the version of the commit that wrote it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedValue {
    pub value: Vec<u8>,
    pub version: Version,
}

/// One historical write to a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyModification {
    /// Id of the invocation that performed the write.
    pub tx_id: String,
    /// Bytes written (empty for deletions).
    pub value: Vec<u8>,
    pub timestamp: Timestamp,
    pub is_delete: bool,
}

/// Key observed by an invocation, with the version it saw (`None` = absent).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadVersion {
    pub key: Vec<u8>,
    pub version: Option<Version>,
}

/// Read set and write set of one invocation, committed as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitBatch {
    pub tx_id: String,
    pub timestamp: Timestamp,
    pub reads: Vec<ReadVersion>,
    pub writes: Vec<(Vec<u8>, Vec<u8>)>,
}

impl CommitBatch {
    pub fn is_read_only(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Versioned key-value world state the ledger reads and writes through.
///
/// ## Atomicity
///
/// `commit` applies every write of the batch or none of them. Before applying,
/// it checks that each key in the read set still carries the version the
/// invocation observed; any mismatch rejects the whole batch with
/// `StoreError::Conflict`. Retrying a conflicted invocation is the caller's job.
pub trait WorldState: Send + Sync {
    /// Get the current value of a key and its version.
    fn get_state(&self, key: &[u8]) -> Result<Option<VersionedValue>, StoreError>;

    /// All entries with `start <= key < end`, in ascending key order.
    fn range_scan(&self, start: &[u8], end: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError>;

    /// Every write ever committed to `key`, oldest first.
    fn history_for_key(&self, key: &[u8]) -> Result<Vec<KeyModification>, StoreError>;

    /// Validate the read set and apply the write set atomically.
    fn commit(&mut self, batch: CommitBatch) -> Result<(), StoreError>;
}

/// Abstract interface for time operations (for testability).
pub trait TimeSource: Send + Sync {
    /// Timestamp to stamp the next invocation with.
    fn now(&self) -> Timestamp;
}

/// Default time source using the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        chrono::Utc::now()
    }
}

/// Time source that always returns the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource(pub Timestamp);

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        self.0
    }
}
