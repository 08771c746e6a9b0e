//! # Domain Errors
//!
//! Error types for the energy ledger.
//!
//! ## Taxonomy
//!
//! | Kind | Raised when |
//! |------|-------------|
//! | `InvalidArgument` | non-positive amount, negative field update, malformed id |
//! | `NotFound` | referenced account, trade, offer or index entry is absent |
//! | `AlreadyExists` | duplicate id or duplicate indexed identity attribute |
//! | `InsufficientBalance` | energy or currency shortfall at the moment of the check |
//! | `AlreadyCompleted` | settling a trade twice |
//! | `EncodingFailure` | a record could not be serialized or deserialized |
//! | `Storage` | the world state refused a read or a commit |
//!
//! Every failure is returned verbatim to the invoking layer. Nothing is retried
//! inside the ledger.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which asset a balance check was about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Asset {
    Energy,
    Currency,
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Asset::Energy => "energy",
            Asset::Currency => "currency",
        })
    }
}

/// Kind of record an id refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Account,
    Trade,
    Offer,
    Email,
    FiscalId,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RecordKind::Account => "account",
            RecordKind::Trade => "trade",
            RecordKind::Offer => "offer",
            RecordKind::Email => "email",
            RecordKind::FiscalId => "fiscal id",
        })
    }
}

/// Flat error classification for callers that branch on the taxonomy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    InsufficientBalance,
    AlreadyCompleted,
    EncodingFailure,
    Storage,
}

/// Errors raised by ledger operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("{kind} {id} does not exist")]
    NotFound { kind: RecordKind, id: String },

    #[error("{kind} {id} is already registered")]
    AlreadyExists { kind: RecordKind, id: String },

    #[error("{account_id} has insufficient {asset} balance: has {available:.2}, needs {required:.2}")]
    InsufficientBalance {
        account_id: String,
        asset: Asset,
        available: f64,
        required: f64,
    },

    #[error("trade {trade_id} is already completed")]
    AlreadyCompleted { trade_id: String },

    #[error("failed to encode record at {key}: {message}")]
    Encoding { key: String, message: String },

    #[error("world state error: {0}")]
    Store(#[from] StoreError),
}

impl LedgerError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        LedgerError::InvalidArgument {
            reason: reason.into(),
        }
    }

    pub fn not_found(kind: RecordKind, id: impl Into<String>) -> Self {
        LedgerError::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn already_exists(kind: RecordKind, id: impl Into<String>) -> Self {
        LedgerError::AlreadyExists {
            kind,
            id: id.into(),
        }
    }

    /// Classify this error against the ledger taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            LedgerError::NotFound { .. } => ErrorKind::NotFound,
            LedgerError::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            LedgerError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            LedgerError::AlreadyCompleted { .. } => ErrorKind::AlreadyCompleted,
            LedgerError::Encoding { .. } => ErrorKind::EncodingFailure,
            LedgerError::Store(_) => ErrorKind::Storage,
        }
    }
}

/// Errors reported by a `WorldState` implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Underlying engine I/O failure.
    #[error("I/O error: {message}")]
    Io { message: String },

    /// A key read by the invocation changed before its commit.
    #[error("read conflict on key {key}: modified by a concurrent commit")]
    Conflict { key: String },

    /// Stored bytes could not be interpreted by the adapter.
    #[error("corrupted world state: {message}")]
    Corrupted { message: String },
}
