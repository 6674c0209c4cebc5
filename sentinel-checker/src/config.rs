//! Checker configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default delay between passes and between retries.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(10);

/// Configuration for a [`TrustChecker`](crate::TrustChecker).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct CheckerConfig {
    /// Delay after every pass, failed root fetch, or empty-ledger response.
    pub interval: Duration,
}

impl CheckerConfig {
    /// Create a config with the default 10 second interval.
    #[must_use]
    pub fn new() -> Self {
        Self { interval: DEFAULT_INTERVAL }
    }

    /// Replace the sleep interval.
    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self::new()
    }
}
