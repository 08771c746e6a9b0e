//! # Invocation Context
//!
//! A `TxContext` is bound to exactly one ledger invocation. It buffers every
//! write so nothing reaches the world state until the invocation succeeds, and
//! it records the version of every key it reads so the world state can reject
//! the commit if one of those keys moved in the meantime.
//!
//! Reads see the invocation's own buffered writes (read-your-writes), which is
//! what lets settlement reload an account after the energy leg and observe the
//! balance that leg just produced.

use crate::domain::entities::Timestamp;
use crate::domain::errors::{LedgerError, StoreError};
use crate::domain::keys::display_key;
use crate::ports::outbound::{CommitBatch, KeyModification, ReadVersion, Version, WorldState};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;

/// Execution context for one ordered invocation.
pub struct TxContext<'a, S: WorldState> {
    tx_id: String,
    timestamp: Timestamp,
    state: &'a S,
    writes: BTreeMap<Vec<u8>, Vec<u8>>,
    reads: BTreeMap<Vec<u8>, Option<Version>>,
}

impl<'a, S: WorldState> TxContext<'a, S> {
    pub fn new(state: &'a S, tx_id: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            tx_id: tx_id.into(),
            timestamp,
            state,
            writes: BTreeMap::new(),
            reads: BTreeMap::new(),
        }
    }

    pub fn tx_id(&self) -> &str {
        &self.tx_id
    }

    /// Timestamp of this invocation; every record written by it carries this value.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Number of keys written so far.
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Read a key, preferring this invocation's own buffered write.
    pub fn get_state(&mut self, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        if let Some(value) = self.writes.get(key) {
            return Ok(Some(value.clone()));
        }

        let found = self.state.get_state(key)?;
        // Keep the first version observed; a later re-read must not mask a change.
        self.reads
            .entry(key.to_vec())
            .or_insert_with(|| found.as_ref().map(|v| v.version));
        Ok(found.map(|v| v.value))
    }

    /// Buffer a write. It becomes visible to other invocations only on commit.
    pub fn put_state(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.writes.insert(key, value);
    }

    /// Range scan over committed state overlaid with this invocation's writes.
    pub fn range_scan(&self, start: &[u8], end: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let mut merged: BTreeMap<Vec<u8>, Vec<u8>> =
            self.state.range_scan(start, end)?.into_iter().collect();

        if start < end {
            for (key, value) in self.writes.range(start.to_vec()..end.to_vec()) {
                merged.insert(key.clone(), value.clone());
            }
        }

        Ok(merged.into_iter().collect())
    }

    /// Committed history of a key, oldest first.
    pub fn history_for_key(&self, key: &[u8]) -> Result<Vec<KeyModification>, StoreError> {
        self.state.history_for_key(key)
    }

    /// Read and decode a JSON record.
    pub fn get_record<T: DeserializeOwned>(&mut self, key: &[u8]) -> Result<Option<T>, LedgerError> {
        match self.get_state(key)? {
            Some(bytes) => decode_record(key, &bytes).map(Some),
            None => Ok(None),
        }
    }

    /// Encode a record as JSON and buffer the write.
    pub fn put_record<T: Serialize>(&mut self, key: Vec<u8>, record: &T) -> Result<(), LedgerError> {
        let bytes = encode_record(&key, record)?;
        self.put_state(key, bytes);
        Ok(())
    }

    /// Whether a key currently holds a value.
    pub fn exists(&mut self, key: &[u8]) -> Result<bool, LedgerError> {
        Ok(self.get_state(key)?.is_some())
    }

    /// Turn the context into the batch handed to `WorldState::commit`.
    pub fn into_batch(self) -> CommitBatch {
        CommitBatch {
            tx_id: self.tx_id,
            timestamp: self.timestamp,
            reads: self
                .reads
                .into_iter()
                .map(|(key, version)| ReadVersion { key, version })
                .collect(),
            writes: self.writes.into_iter().collect(),
        }
    }
}

/// Serialize a record to its self-describing JSON form.
pub fn encode_record<T: Serialize>(key: &[u8], record: &T) -> Result<Vec<u8>, LedgerError> {
    serde_json::to_vec(record).map_err(|e| LedgerError::Encoding {
        key: display_key(key),
        message: e.to_string(),
    })
}

/// Deserialize a record from its JSON form.
pub fn decode_record<T: DeserializeOwned>(key: &[u8], bytes: &[u8]) -> Result<T, LedgerError> {
    serde_json::from_slice(bytes).map_err(|e| LedgerError::Encoding {
        key: display_key(key),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryWorldState;
    use chrono::{TimeZone, Utc};

    fn ts() -> Timestamp {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap()
    }

    fn seeded_state() -> InMemoryWorldState {
        let mut state = InMemoryWorldState::new();
        state
            .commit(CommitBatch {
                tx_id: "seed".into(),
                timestamp: ts(),
                reads: vec![],
                writes: vec![
                    (b"account/A".to_vec(), b"1".to_vec()),
                    (b"account/C".to_vec(), b"3".to_vec()),
                    (b"offer/X".to_vec(), b"x".to_vec()),
                ],
            })
            .unwrap();
        state
    }

    #[test]
    fn test_reads_see_own_writes() {
        let state = seeded_state();
        let mut ctx = TxContext::new(&state, "tx-1", ts());

        assert_eq!(ctx.get_state(b"account/A").unwrap(), Some(b"1".to_vec()));
        ctx.put_state(b"account/A".to_vec(), b"9".to_vec());
        assert_eq!(ctx.get_state(b"account/A").unwrap(), Some(b"9".to_vec()));

        // Committed state is untouched until commit.
        assert_eq!(
            state.get_state(b"account/A").unwrap().unwrap().value,
            b"1".to_vec()
        );
    }

    #[test]
    fn test_range_scan_overlays_buffered_writes() {
        let state = seeded_state();
        let mut ctx = TxContext::new(&state, "tx-1", ts());
        ctx.put_state(b"account/B".to_vec(), b"2".to_vec());
        ctx.put_state(b"account/C".to_vec(), b"33".to_vec());

        let rows = ctx.range_scan(b"account/", b"account0").unwrap();
        let values: Vec<_> = rows.into_iter().map(|(_, v)| v).collect();
        assert_eq!(values, vec![b"1".to_vec(), b"2".to_vec(), b"33".to_vec()]);
    }

    #[test]
    fn test_batch_records_first_observed_versions() {
        let state = seeded_state();
        let mut ctx = TxContext::new(&state, "tx-1", ts());

        ctx.get_state(b"account/A").unwrap();
        ctx.get_state(b"account/Z").unwrap();
        ctx.put_state(b"account/A".to_vec(), b"2".to_vec());
        ctx.get_state(b"account/A").unwrap();

        let batch = ctx.into_batch();
        assert_eq!(batch.reads.len(), 2);
        assert!(batch
            .reads
            .iter()
            .any(|r| r.key == b"account/Z".to_vec() && r.version.is_none()));
        assert!(batch
            .reads
            .iter()
            .any(|r| r.key == b"account/A".to_vec() && r.version.is_some()));
        assert_eq!(batch.writes.len(), 1);
    }

    #[test]
    fn test_decode_failure_is_encoding_error() {
        let err = decode_record::<crate::domain::entities::Trade>(b"trade/T1", b"not json")
            .unwrap_err();
        assert_eq!(err.kind(), crate::domain::errors::ErrorKind::EncodingFailure);
    }
}
