//! # RocksDB World State
//!
//! Persistent implementation of the ledger's `WorldState` port.
//!
//! ## Column Families
//!
//! - `state` - current value of every ledger key
//! - `versions` - key -> version of the commit that last wrote it (u64, big endian)
//! - `history` - `key length (u64, big endian) key version` -> bincode `StoredModification`
//! - `meta` - `last_version`
//!
//! ## Commits
//!
//! A commit validates the batch's read set against `versions` and then writes
//! every value, version and history record through one `WriteBatch`, so a
//! crash never leaves half of an invocation on disk.

use etn_ledger::{
    CommitBatch, KeyModification, StoreError, Timestamp, Version, VersionedValue, WorldState,
};
use parking_lot::RwLock;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options, WriteBatch, DB};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::config::StorageConfig;

/// Column family names
pub const CF_STATE: &str = "state";
pub const CF_VERSIONS: &str = "versions";
pub const CF_HISTORY: &str = "history";
pub const CF_META: &str = "meta";

/// All column families used by the world state
pub const COLUMN_FAMILIES: &[&str] = &[CF_STATE, CF_VERSIONS, CF_HISTORY, CF_META];

const LAST_VERSION_KEY: &[u8] = b"last_version";

/// RocksDB configuration
#[derive(Debug, Clone)]
pub struct RocksDbConfig {
    /// Path to the database directory
    pub path: String,
    /// Block cache size in bytes (default: 64MB)
    pub block_cache_size: usize,
    /// Write buffer size in bytes (default: 32MB)
    pub write_buffer_size: usize,
    /// Maximum number of write buffers (default: 3)
    pub max_write_buffer_number: i32,
    /// Enable fsync after each commit (default: true for durability)
    pub sync_writes: bool,
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            path: "./data/ledger".to_string(),
            block_cache_size: 64 * 1024 * 1024,  // 64MB
            write_buffer_size: 32 * 1024 * 1024, // 32MB
            max_write_buffer_number: 3,
            sync_writes: true,
        }
    }
}

impl RocksDbConfig {
    /// Create config for testing (smaller buffers, no sync)
    pub fn for_testing(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            block_cache_size: 8 * 1024 * 1024,  // 8MB
            write_buffer_size: 4 * 1024 * 1024, // 4MB
            max_write_buffer_number: 2,
            sync_writes: false,
        }
    }

    pub fn from_storage(storage: &StorageConfig) -> Self {
        Self {
            path: storage.data_dir.to_string_lossy().to_string(),
            sync_writes: storage.sync_writes,
            ..Default::default()
        }
    }
}

/// History record as persisted in the `history` column family.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredModification {
    tx_id: String,
    value: Vec<u8>,
    timestamp: Timestamp,
    is_delete: bool,
}

fn io_error(context: &str, e: rocksdb::Error) -> StoreError {
    StoreError::Io {
        message: format!("RocksDB {context} failed: {e}"),
    }
}

fn decode_version(bytes: &[u8]) -> Result<Version, StoreError> {
    let raw: [u8; 8] = bytes.try_into().map_err(|_| StoreError::Corrupted {
        message: format!("version record has {} bytes, expected 8", bytes.len()),
    })?;
    Ok(Version::from_be_bytes(raw))
}

/// Length-prefixed so no key's history range contains another key's records.
fn history_prefix(key: &[u8]) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(8 + key.len());
    prefix.extend_from_slice(&(key.len() as u64).to_be_bytes());
    prefix.extend_from_slice(key);
    prefix
}

fn history_key(key: &[u8], version: Version) -> Vec<u8> {
    let mut full = history_prefix(key);
    full.extend_from_slice(&version.to_be_bytes());
    full
}

/// RocksDB-backed world state implementing the `WorldState` port
pub struct RocksDbWorldState {
    db: Arc<RwLock<DB>>,
    config: RocksDbConfig,
    last_version: Version,
}

impl RocksDbWorldState {
    /// Open or create the database
    pub fn open(config: RocksDbConfig) -> Result<Self, StoreError> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        // Performance tuning
        opts.set_write_buffer_size(config.write_buffer_size);
        opts.set_max_write_buffer_number(config.max_write_buffer_number);

        // Compression
        opts.set_compression_type(rocksdb::DBCompressionType::Snappy);

        // Bloom filter for point reads
        let mut block_opts = rocksdb::BlockBasedOptions::default();
        block_opts.set_bloom_filter(10.0, false);
        block_opts.set_block_cache(&rocksdb::Cache::new_lru_cache(config.block_cache_size));
        opts.set_block_based_table_factory(&block_opts);

        let cf_descriptors: Vec<ColumnFamilyDescriptor> = COLUMN_FAMILIES
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_compression_type(rocksdb::DBCompressionType::Snappy);
                ColumnFamilyDescriptor::new(*name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&opts, &config.path, cf_descriptors)
            .map_err(|e| io_error("open", e))?;

        let last_version = {
            let meta = cf(&db, CF_META)?;
            match db.get_cf(meta, LAST_VERSION_KEY).map_err(|e| io_error("get", e))? {
                Some(bytes) => decode_version(&bytes)?,
                None => 0,
            }
        };

        debug!(path = %config.path, last_version, "[etn] rocksdb world state opened");
        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            config,
            last_version,
        })
    }

    /// Open with default tuning at `path`
    pub fn open_default(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open(RocksDbConfig {
            path: path.as_ref().to_string_lossy().to_string(),
            ..Default::default()
        })
    }

    /// Version of the most recent commit (0 before the first).
    pub fn last_version(&self) -> Version {
        self.last_version
    }

    fn validate_reads(&self, db: &DB, batch: &CommitBatch) -> Result<(), StoreError> {
        let versions = cf(db, CF_VERSIONS)?;
        for read in &batch.reads {
            let current = db
                .get_cf(versions, &read.key)
                .map_err(|e| io_error("get", e))?
                .map(|bytes| decode_version(&bytes))
                .transpose()?;
            if current != read.version {
                return Err(StoreError::Conflict {
                    key: String::from_utf8_lossy(&read.key).into_owned(),
                });
            }
        }
        Ok(())
    }
}

fn cf<'a>(db: &'a DB, name: &str) -> Result<&'a ColumnFamily, StoreError> {
    db.cf_handle(name).ok_or_else(|| StoreError::Corrupted {
        message: format!("missing column family {name}"),
    })
}

impl WorldState for RocksDbWorldState {
    fn get_state(&self, key: &[u8]) -> Result<Option<VersionedValue>, StoreError> {
        let db = self.db.read();
        let value = match db.get_cf(cf(&db, CF_STATE)?, key).map_err(|e| io_error("get", e))? {
            Some(value) => value,
            None => return Ok(None),
        };
        let version = match db
            .get_cf(cf(&db, CF_VERSIONS)?, key)
            .map_err(|e| io_error("get", e))?
        {
            Some(bytes) => decode_version(&bytes)?,
            None => {
                return Err(StoreError::Corrupted {
                    message: format!(
                        "key {} has a value but no version",
                        String::from_utf8_lossy(key)
                    ),
                })
            }
        };
        Ok(Some(VersionedValue { value, version }))
    }

    fn range_scan(&self, start: &[u8], end: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>, StoreError> {
        let db = self.db.read();
        let mut results = Vec::new();

        let iter = db.iterator_cf(cf(&db, CF_STATE)?, IteratorMode::From(start, Direction::Forward));
        for item in iter {
            let (key, value) = item.map_err(|e| io_error("scan", e))?;
            if &*key >= end {
                break;
            }
            results.push((key.to_vec(), value.to_vec()));
        }
        Ok(results)
    }

    fn history_for_key(&self, key: &[u8]) -> Result<Vec<KeyModification>, StoreError> {
        let db = self.db.read();
        let prefix = history_prefix(key);
        let mut results = Vec::new();

        let iter = db.iterator_cf(
            cf(&db, CF_HISTORY)?,
            IteratorMode::From(&prefix, Direction::Forward),
        );
        for item in iter {
            let (stored_key, bytes) = item.map_err(|e| io_error("scan", e))?;
            if !stored_key.starts_with(&prefix) {
                break;
            }
            let record: StoredModification =
                bincode::deserialize(&bytes).map_err(|e| StoreError::Corrupted {
                    message: format!("history record: {e}"),
                })?;
            results.push(KeyModification {
                tx_id: record.tx_id,
                value: record.value,
                timestamp: record.timestamp,
                is_delete: record.is_delete,
            });
        }
        Ok(results)
    }

    fn commit(&mut self, batch: CommitBatch) -> Result<(), StoreError> {
        let db = self.db.write();
        self.validate_reads(&db, &batch)?;
        if batch.is_read_only() {
            return Ok(());
        }

        let version = self.last_version + 1;
        let version_bytes = version.to_be_bytes();
        let (state, versions, history, meta) = (
            cf(&db, CF_STATE)?,
            cf(&db, CF_VERSIONS)?,
            cf(&db, CF_HISTORY)?,
            cf(&db, CF_META)?,
        );

        let mut write = WriteBatch::default();
        for (key, value) in &batch.writes {
            let record = StoredModification {
                tx_id: batch.tx_id.clone(),
                value: value.clone(),
                timestamp: batch.timestamp,
                is_delete: false,
            };
            let encoded = bincode::serialize(&record).map_err(|e| StoreError::Corrupted {
                message: format!("history record: {e}"),
            })?;

            write.put_cf(state, key, value);
            write.put_cf(versions, key, version_bytes);
            write.put_cf(history, history_key(key, version), encoded);
        }
        write.put_cf(meta, LAST_VERSION_KEY, version_bytes);

        let mut write_opts = rocksdb::WriteOptions::default();
        write_opts.set_sync(self.config.sync_writes);
        db.write_opt(write, &write_opts)
            .map_err(|e| io_error("batch write", e))?;

        self.last_version = version;
        debug!(tx = %batch.tx_id, version, writes = batch.writes.len(), "[etn] batch committed");
        Ok(())
    }
}
