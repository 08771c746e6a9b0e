//! # Key Namespaces
//!
//! The world state is one flat, lexicographically ordered key space. Each record
//! kind lives under its own prefix so every collection can be range-scanned on
//! its own, without decoding records of other kinds.

/// Key prefixes for world-state records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPrefix {
    /// Account record: `account/{id}` -> Account
    Account,
    /// Trade record: `trade/{id}` -> Trade
    Trade,
    /// Offer record: `offer/{id}` -> Offer
    Offer,
    /// Email index: `index/email/{email}` -> IndexEntry
    EmailIndex,
    /// Fiscal id index: `index/fiscal/{fiscal_id}` -> IndexEntry
    FiscalIndex,
}

impl KeyPrefix {
    /// Get the byte prefix for this key type.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            KeyPrefix::Account => b"account/",
            KeyPrefix::Trade => b"trade/",
            KeyPrefix::Offer => b"offer/",
            KeyPrefix::EmailIndex => b"index/email/",
            KeyPrefix::FiscalIndex => b"index/fiscal/",
        }
    }

    /// Build a full key with the given suffix.
    pub fn key(&self, suffix: &str) -> Vec<u8> {
        let mut key = self.as_bytes().to_vec();
        key.extend_from_slice(suffix.as_bytes());
        key
    }

    /// Half-open `[start, end)` range covering every key under this prefix.
    ///
    /// Every prefix ends in `/`, so bumping that last byte to `0` yields the
    /// first key past the namespace.
    pub fn range(&self) -> (Vec<u8>, Vec<u8>) {
        let start = self.as_bytes().to_vec();
        let mut end = start.clone();
        if let Some(last) = end.last_mut() {
            *last += 1;
        }
        (start, end)
    }

    pub fn account_key(id: &str) -> Vec<u8> {
        KeyPrefix::Account.key(id)
    }

    pub fn trade_key(id: &str) -> Vec<u8> {
        KeyPrefix::Trade.key(id)
    }

    pub fn offer_key(id: &str) -> Vec<u8> {
        KeyPrefix::Offer.key(id)
    }

    pub fn email_key(email: &str) -> Vec<u8> {
        KeyPrefix::EmailIndex.key(email)
    }

    pub fn fiscal_key(fiscal_id: &str) -> Vec<u8> {
        KeyPrefix::FiscalIndex.key(fiscal_id)
    }
}

/// Render a key for error messages and logs.
pub fn display_key(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}
