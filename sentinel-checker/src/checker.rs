//! The verification loop.
//!
//! One sequential worker repeats: fetch root → shuffle `[0, root.index]` →
//! verify every index in that order → sleep. Any `verified == false` result
//! marks the ledger untrusted for the rest of the process lifetime.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::Instrument as _;

use sentinel_core::{PassReport, Root};

use crate::clock::{Clock, Wake};
use crate::scheduler::IndexScheduler;
use crate::trust::TrustState;
use crate::{CheckerConfig, CheckerError, LedgerClient};

/// Result of a single [`TrustChecker::run_pass`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// The root could not be fetched or its range could not be scheduled.
    RootUnavailable,
    /// The ledger has no entries yet.
    EmptyLedger,
    /// A stop was requested while the root was being fetched.
    Cancelled,
    /// The range was scanned (possibly interrupted; see [`PassReport::completed`]).
    Scanned(PassReport),
}

/// Background trust checker over a [`LedgerClient`].
///
/// `start` drives the loop on the calling task; `stop`, `status` and
/// `last_pass` may be called concurrently from anywhere, typically through an
/// `Arc<TrustChecker<_>>`.
pub struct TrustChecker<C: LedgerClient> {
    client: C,
    scheduler: IndexScheduler,
    clock: Clock,
    trust: TrustState,
    cancel: CancellationToken,
    running: AtomicBool,
    last_pass: watch::Sender<Option<PassReport>>,
}

impl<C: LedgerClient> TrustChecker<C> {
    /// Create a checker with OS-seeded scan order.
    #[must_use]
    pub fn new(client: C, config: &CheckerConfig) -> Self {
        Self::with_scheduler(client, config, IndexScheduler::with_os_entropy())
    }

    /// Create a checker with a custom scheduler.
    #[must_use]
    pub fn with_scheduler(client: C, config: &CheckerConfig, scheduler: IndexScheduler) -> Self {
        let (last_pass, _) = watch::channel(None);
        Self {
            client,
            scheduler,
            clock: Clock::new(config.interval),
            trust: TrustState::new(),
            cancel: CancellationToken::new(),
            running: AtomicBool::new(false),
            last_pass,
        }
    }

    /// Tie this checker to an external cancellation token.
    ///
    /// Cancelling `token` has the same effect as [`TrustChecker::stop`].
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Run the loop until [`TrustChecker::stop`] is called.
    ///
    /// Operational errors are logged and retried after one interval; they
    /// never end the loop. Returns immediately if the checker was already
    /// stopped.
    ///
    /// # Errors
    /// Returns [`CheckerError::AlreadyRunning`] if another `start` on this
    /// checker has not returned yet.
    pub async fn start(&self) -> Result<(), CheckerError> {
        if self.running.swap(true, Ordering::AcqRel) {
            return Err(CheckerError::AlreadyRunning);
        }
        let _running = RunningGuard(&self.running);

        tracing::info!("start scanning");
        while !self.cancel.is_cancelled() {
            self.run_pass().await;
            if self.clock.sleep(&self.cancel).await == Wake::Cancelled {
                break;
            }
        }
        tracing::info!("trust checker stopped");
        Ok(())
    }

    /// Request the loop to stop.
    ///
    /// Non-blocking and idempotent. Interrupts an in-flight root fetch, item
    /// verification or sleep.
    pub fn stop(&self) {
        if !self.cancel.is_cancelled() {
            tracing::info!("stop requested");
        }
        self.cancel.cancel();
    }

    /// Return `true` if no verification mismatch has ever been observed.
    #[must_use]
    pub fn status(&self) -> bool {
        self.trust.is_trusted()
    }

    /// Return the report of the most recent scanned pass.
    #[must_use]
    pub fn last_pass(&self) -> Option<PassReport> {
        self.last_pass.borrow().clone()
    }

    /// Watch pass reports as they are published.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<PassReport>> {
        self.last_pass.subscribe()
    }

    /// Perform one fetch-and-scan cycle without sleeping.
    pub async fn run_pass(&self) -> PassOutcome {
        tracing::info!("retrieving a fresh root");
        let fetched = tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                tracing::info!("root fetch interrupted");
                return PassOutcome::Cancelled;
            }
            fetched = self.client.current_root() => fetched,
        };
        let root = match fetched {
            Ok(root) => root,
            Err(e) => {
                tracing::error!(error = %e, "error retrieving root");
                return PassOutcome::RootUnavailable;
            }
        };

        if root.is_empty() {
            tracing::info!("ledger is empty");
            return PassOutcome::EmptyLedger;
        }

        let order = match self.schedule(&root) {
            Ok(order) => order,
            Err(e) => {
                tracing::error!(root_index = root.index, error = %e, "cannot schedule pass");
                return PassOutcome::RootUnavailable;
            }
        };

        let mut report = PassReport::begin(root.index);
        let span = tracing::info_span!("pass", pass_id = %report.pass_id, root_index = root.index);
        let completed = self.scan(&order, &mut report).instrument(span.clone()).await;
        report.finish(completed);

        span.in_scope(|| {
            tracing::info!(
                attempted = report.attempted,
                verified = report.verified,
                transport_errors = report.transport_errors,
                failures = report.failed_indices.len(),
                completed,
                "pass finished"
            );
        });

        self.last_pass.send_replace(Some(report.clone()));
        PassOutcome::Scanned(report)
    }

    fn schedule(&self, root: &Root) -> Result<Vec<u64>, CheckerError> {
        let count = root.entry_count()?;
        self.scheduler.generate(count)
    }

    /// Verify every index in `order`. Returns `false` if interrupted.
    async fn scan(&self, order: &[u64], report: &mut PassReport) -> bool {
        tracing::info!(count = order.len(), "start scanning elements");
        for (position, &index) in order.iter().enumerate() {
            let result = tokio::select! {
                biased;
                () = self.cancel.cancelled() => {
                    tracing::info!(remaining = order.len() - position, "pass interrupted");
                    return false;
                }
                result = self.client.verify_item(index) => result,
            };

            match result {
                Err(e) => {
                    tracing::error!(index, error = %e, "error retrieving element");
                    report.record_transport_error();
                }
                Ok(item) => {
                    tracing::debug!(
                        index = item.index,
                        value_len = item.value.len(),
                        verified = item.verified,
                        "item checked"
                    );
                    if item.index != index {
                        tracing::warn!(requested = index, served = item.index, "ledger served a different index");
                        self.record_failure(index, item.index, report);
                    } else if item.verified {
                        report.record_verified();
                    } else {
                        self.record_failure(index, item.index, report);
                    }
                }
            }
        }
        true
    }

    fn record_failure(&self, index: u64, served: u64, report: &mut PassReport) {
        if self.trust.mark_untrusted() {
            tracing::warn!("ledger is no longer trusted");
        }
        tracing::error!(index, served, "consistency check fail");
        report.record_failure(index);
    }
}

/// Clears the running flag when `start` returns or its future is dropped.
struct RunningGuard<'a>(&'a AtomicBool);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;
    use sentinel_core::{Digest, VerifiedItem};

    use super::*;
    use crate::LedgerError;

    /// Ledger of `len` entries where every listed index fails verification.
    struct StaticLedger {
        len: u64,
        bad: Vec<u64>,
    }

    #[async_trait]
    impl LedgerClient for StaticLedger {
        async fn current_root(&self) -> Result<Root, LedgerError> {
            if self.len == 0 {
                return Ok(Root::empty());
            }
            match Digest::new(vec![0xaa]) {
                Ok(d) => Ok(Root::new(self.len - 1, d)),
                Err(e) => Err(LedgerError::Http(e.to_string())),
            }
        }

        async fn verify_item(&self, index: u64) -> Result<VerifiedItem, LedgerError> {
            Ok(VerifiedItem::new(index, index.to_le_bytes().to_vec(), !self.bad.contains(&index)))
        }
    }

    /// Ledger that accepts root requests and never answers them.
    struct StalledLedger;

    #[async_trait]
    impl LedgerClient for StalledLedger {
        async fn current_root(&self) -> Result<Root, LedgerError> {
            std::future::pending().await
        }

        async fn verify_item(&self, _index: u64) -> Result<VerifiedItem, LedgerError> {
            std::future::pending().await
        }
    }

    fn config() -> CheckerConfig {
        CheckerConfig::new().with_interval(Duration::from_millis(5))
    }

    #[tokio::test]
    async fn run_pass_reports_clean_scan() {
        let checker = TrustChecker::new(StaticLedger { len: 5, bad: vec![] }, &config());
        match checker.run_pass().await {
            PassOutcome::Scanned(report) => {
                assert_eq!(report.root_index, 4);
                assert_eq!(report.attempted, 5);
                assert_eq!(report.verified, 5);
                assert!(report.completed);
                assert!(report.is_clean());
            }
            other => panic!("expected Scanned, got {other:?}"),
        }
        assert!(checker.status());
        assert!(checker.last_pass().is_some(), "scanned pass must be published");
    }

    #[tokio::test]
    async fn run_pass_on_empty_ledger_publishes_nothing() {
        let checker = TrustChecker::new(StaticLedger { len: 0, bad: vec![] }, &config());
        assert_eq!(checker.run_pass().await, PassOutcome::EmptyLedger);
        assert!(checker.last_pass().is_none());
        assert!(checker.status());
    }

    #[tokio::test]
    async fn run_pass_marks_untrusted_on_failure() {
        let checker = TrustChecker::new(StaticLedger { len: 5, bad: vec![3] }, &config());
        match checker.run_pass().await {
            PassOutcome::Scanned(report) => assert_eq!(report.failed_indices, vec![3]),
            other => panic!("expected Scanned, got {other:?}"),
        }
        assert!(!checker.status());
    }

    #[tokio::test]
    async fn run_pass_returns_cancelled_when_root_fetch_stalls() {
        let checker = Arc::new(TrustChecker::new(StalledLedger, &config()));
        let stopper = Arc::clone(&checker);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            stopper.stop();
        });

        let outcome = tokio::time::timeout(Duration::from_secs(1), checker.run_pass()).await;
        assert_eq!(outcome.ok(), Some(PassOutcome::Cancelled), "stop must cut a hung root fetch short");
        assert!(checker.last_pass().is_none(), "no scan happened");
        assert!(checker.status());
    }

    #[tokio::test]
    async fn stop_unblocks_start_while_root_fetch_stalls() {
        let checker = Arc::new(TrustChecker::new(StalledLedger, &config()));
        let runner = Arc::clone(&checker);
        let handle = tokio::spawn(async move { runner.start().await });

        tokio::time::sleep(Duration::from_millis(50)).await;
        checker.stop();

        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(Ok(()))) => {}
            other => panic!("start did not return after stop: {other:?}"),
        }
    }

    #[tokio::test]
    async fn start_after_stop_returns_immediately() {
        let checker = TrustChecker::new(StaticLedger { len: 5, bad: vec![] }, &config());
        checker.stop();
        let result = tokio::time::timeout(Duration::from_secs(1), checker.start()).await;
        assert!(matches!(result, Ok(Ok(()))), "stopped checker must not scan");
        assert!(checker.last_pass().is_none());
    }

    #[tokio::test]
    async fn second_concurrent_start_is_rejected() {
        let checker = Arc::new(TrustChecker::new(StaticLedger { len: 5, bad: vec![] }, &config()));
        let runner = Arc::clone(&checker);
        let first = tokio::spawn(async move { runner.start().await });

        let mut passes = checker.subscribe();
        if passes.changed().await.is_err() {
            panic!("checker dropped before first pass");
        }

        assert!(matches!(checker.start().await, Err(CheckerError::AlreadyRunning)));

        checker.stop();
        match tokio::time::timeout(Duration::from_secs(1), first).await {
            Ok(Ok(Ok(()))) => {}
            other => panic!("first start did not stop cleanly: {other:?}"),
        }
    }

    #[tokio::test]
    async fn external_token_cancels_loop() {
        let token = CancellationToken::new();
        let checker = Arc::new(
            TrustChecker::new(StaticLedger { len: 3, bad: vec![] }, &config())
                .with_cancellation(token.clone()),
        );
        let runner = Arc::clone(&checker);
        let handle = tokio::spawn(async move { runner.start().await });

        token.cancel();
        match tokio::time::timeout(Duration::from_secs(1), handle).await {
            Ok(Ok(Ok(()))) => {}
            other => panic!("external cancellation did not stop the loop: {other:?}"),
        }
    }
}
