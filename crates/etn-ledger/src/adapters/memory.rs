//! # In-Memory World State
//!
//! `WorldState` backed by ordered maps, with per-key versions and full write
//! history. Used by tests and by the node when no persistent backend is
//! configured.

use crate::domain::errors::StoreError;
use crate::domain::keys::display_key;
use crate::ports::outbound::{CommitBatch, KeyModification, Version, VersionedValue, WorldState};
use std::collections::{BTreeMap, HashMap};

/// In-memory world state.
///
/// Commits are validated and applied under `&mut self`, so a batch is never
/// observed half-applied.
#[derive(Debug, Default)]
pub struct InMemoryWorldState {
    data: BTreeMap<Vec<u8>, VersionedValue>,
    history: HashMap<Vec<u8>, Vec<KeyModification>>,
    last_version: Version,
}

impl InMemoryWorldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently holding a value.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Version assigned to the most recent commit (0 before any commit).
    pub fn last_version(&self) -> Version {
        self.last_version
    }

    fn validate_reads(&self, batch: &CommitBatch) -> Result<(), StoreError> {
        for read in &batch.reads {
            let current = self.data.get(&read.key).map(|v| v.version);
            if current != read.version {
                return Err(StoreError::Conflict {
                    key: display_key(&read.key),
                });
            }
        }
        Ok(())
    }
}

impl WorldState for InMemoryWorldState {
    fn get_state(&self, key: &[u8]) -> Result<Option<VersionedValue>, StoreError> {
        Ok(self.data.get(key).cloned())
    }

    fn range_scan(&self, start: &[u8], end: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        if start >= end {
            return Ok(Vec::new());
        }
        Ok(self
            .data
            .range(start.to_vec()..end.to_vec())
            .map(|(k, v)| (k.clone(), v.value.clone()))
            .collect())
    }

    fn history_for_key(&self, key: &[u8]) -> Result<Vec<KeyModification>, StoreError> {
        Ok(self.history.get(key).cloned().unwrap_or_default())
    }

    fn commit(&mut self, batch: CommitBatch) -> Result<(), StoreError> {
        self.validate_reads(&batch)?;
        if batch.is_read_only() {
            return Ok(());
        }

        self.last_version += 1;
        let version = self.last_version;

        for (key, value) in batch.writes {
            self.history
                .entry(key.clone())
                .or_default()
                .push(KeyModification {
                    tx_id: batch.tx_id.clone(),
                    value: value.clone(),
                    timestamp: batch.timestamp,
                    is_delete: false,
                });
            self.data.insert(key, VersionedValue { value, version });
        }
        Ok(())
    }
}
