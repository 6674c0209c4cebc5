use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Cryptographic digest summarising the ledger content at a given index.
///
/// The checker never interprets the bytes; it only distinguishes a present
/// digest from an absent one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Digest(Vec<u8>);

impl Digest {
    /// Creates a `Digest` from raw bytes.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyDigest`] if `bytes` is empty.
    pub fn new(bytes: Vec<u8>) -> Result<Self, CoreError> {
        if bytes.is_empty() {
            return Err(CoreError::EmptyDigest);
        }
        Ok(Self(bytes))
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for Digest {
    type Error = CoreError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(bytes)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Snapshot of the ledger head: the latest committed index and its digest.
///
/// Fetched fresh at the start of every pass and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct Root {
    /// Zero-based index of the latest committed entry.
    pub index: u64,
    /// Digest at `index`; `None` while the ledger holds no entries.
    pub digest: Option<Digest>,
}

impl Root {
    /// Creates a root for a non-empty ledger.
    #[must_use]
    pub fn new(index: u64, digest: Digest) -> Self {
        Self { index, digest: Some(digest) }
    }

    /// Creates the root reported by a ledger that has nothing committed yet.
    #[must_use]
    pub fn empty() -> Self {
        Self { index: 0, digest: None }
    }

    /// Returns `true` if the ledger reported no digest, i.e. nothing to scan.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.digest.is_none()
    }

    /// Number of indices covered by this root: `index + 1`.
    ///
    /// # Errors
    /// Returns [`CoreError::IndexRangeOverflow`] when `index` is `u64::MAX`.
    pub fn entry_count(&self) -> Result<u64, CoreError> {
        self.index
            .checked_add(1)
            .ok_or(CoreError::IndexRangeOverflow { index: self.index })
    }
}

/// Outcome of verifying one ledger entry against the current root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct VerifiedItem {
    /// Index the ledger served.
    pub index: u64,
    /// Raw entry value.
    pub value: Vec<u8>,
    /// Whether the inclusion/consistency proof checked out.
    pub verified: bool,
}

impl VerifiedItem {
    /// Creates a new verification result.
    #[must_use]
    pub fn new(index: u64, value: Vec<u8>, verified: bool) -> Self {
        Self { index, value, verified }
    }
}
