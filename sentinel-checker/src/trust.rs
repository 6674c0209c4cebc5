//! Process-wide trust flag.

use std::sync::atomic::{AtomicBool, Ordering};

/// Records whether any verification mismatch has ever been observed.
///
/// Starts trusted and only ever moves to untrusted. Reads may race the
/// single writer freely.
#[derive(Debug)]
pub struct TrustState {
    trusted: AtomicBool,
}

impl TrustState {
    /// Create a trusted state.
    #[must_use]
    pub fn new() -> Self {
        Self { trusted: AtomicBool::new(true) }
    }

    /// Mark the ledger untrusted.
    ///
    /// Idempotent. Returns `true` only for the call that performed the
    /// trusted → untrusted transition.
    pub fn mark_untrusted(&self) -> bool {
        self.trusted.swap(false, Ordering::AcqRel)
    }

    /// Return `true` if no mismatch has been observed so far.
    #[must_use]
    pub fn is_trusted(&self) -> bool {
        self.trusted.load(Ordering::Acquire)
    }
}

impl Default for TrustState {
    fn default() -> Self {
        Self::new()
    }
}
