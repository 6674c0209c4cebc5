//! Ledger client abstraction trait.
//!
//! The checker only orchestrates calls; proof construction, proof checking
//! and transport belong to the implementation behind this trait.

use std::sync::Arc;

use async_trait::async_trait;
use sentinel_core::{Root, VerifiedItem};

use crate::LedgerError;

/// Read side of a tamper-evident ledger, with verification done client-side.
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
///
/// # Cancel Safety
/// Implementations must be cancel safe: the checker drops an in-flight
/// `verify_item` future when a stop is requested.
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Fetch the current root snapshot.
    ///
    /// An empty ledger is reported as a [`Root`] without digest, not as an error.
    ///
    /// # Errors
    /// Returns a [`LedgerError`] if the ledger cannot be reached or answers
    /// with something that is not a root.
    async fn current_root(&self) -> Result<Root, LedgerError>;

    /// Fetch the entry at `index` and verify it against the current root.
    ///
    /// # Errors
    /// Returns a [`LedgerError`] if the entry cannot be fetched. A proof that
    /// does not check out is a successful call with `verified == false`.
    async fn verify_item(&self, index: u64) -> Result<VerifiedItem, LedgerError>;
}

#[async_trait]
impl<T: LedgerClient + ?Sized> LedgerClient for Arc<T> {
    async fn current_root(&self) -> Result<Root, LedgerError> {
        (**self).current_root().await
    }

    async fn verify_item(&self, index: u64) -> Result<VerifiedItem, LedgerError> {
        (**self).verify_item(index).await
    }
}
