//! Interruptible delay between passes and between retries.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Why a [`Clock::sleep`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wake {
    /// The full interval elapsed.
    Elapsed,
    /// Cancellation was requested before the interval elapsed.
    Cancelled,
}

/// Fixed-interval sleeper that wakes early on cancellation.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    interval: Duration,
}

impl Clock {
    /// Create a clock sleeping for `interval` on every call.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Return the configured interval.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Sleep for the configured interval or until `cancel` fires.
    ///
    /// # Cancel Safety
    /// Cancel safe.
    pub async fn sleep(&self, cancel: &CancellationToken) -> Wake {
        tracing::info!(interval_ms = self.interval.as_millis(), "sleeping before next pass");
        tokio::select! {
            biased;
            () = cancel.cancelled() => Wake::Cancelled,
            () = tokio::time::sleep(self.interval) => Wake::Elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sleep_elapses_without_cancellation() {
        let clock = Clock::new(Duration::from_millis(5));
        let token = CancellationToken::new();
        assert_eq!(clock.sleep(&token).await, Wake::Elapsed);
    }

    #[tokio::test]
    async fn sleep_returns_immediately_when_already_cancelled() {
        let clock = Clock::new(Duration::from_secs(3_600));
        let token = CancellationToken::new();
        token.cancel();
        let wake = tokio::time::timeout(Duration::from_secs(1), clock.sleep(&token)).await;
        assert_eq!(wake.ok(), Some(Wake::Cancelled), "cancelled token must cut the sleep short");
    }

    #[tokio::test]
    async fn sleep_wakes_on_concurrent_cancel() {
        let clock = Clock::new(Duration::from_secs(3_600));
        let token = CancellationToken::new();
        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });
        let wake = tokio::time::timeout(Duration::from_secs(1), clock.sleep(&token)).await;
        assert_eq!(wake.ok(), Some(Wake::Cancelled));
    }
}
