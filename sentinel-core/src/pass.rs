use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single scan pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub struct PassId(pub Uuid);

impl PassId {
    /// Creates a new random `PassId`.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PassId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Summary of one scan over every index present when the pass began.
///
/// Reports are built incrementally while scanning and become immutable
/// once [`PassReport::finish`] is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct PassReport {
    /// Identifier shared by every log event of this pass.
    pub pass_id: PassId,
    /// Root index the pass scanned up to (inclusive).
    pub root_index: u64,
    /// When the pass began scanning.
    pub started_at: DateTime<Utc>,
    /// When the pass stopped scanning; `None` while in progress.
    pub finished_at: Option<DateTime<Utc>>,
    /// Verification calls issued.
    pub attempted: u64,
    /// Calls that returned a verified item.
    pub verified: u64,
    /// Calls that failed in transport and were skipped.
    pub transport_errors: u64,
    /// Indices that failed verification, in scan order.
    pub failed_indices: Vec<u64>,
    /// `false` if the pass was interrupted by cancellation.
    pub completed: bool,
}

impl PassReport {
    /// Starts a report for a pass over `[0, root_index]`.
    #[must_use]
    pub fn begin(root_index: u64) -> Self {
        Self {
            pass_id: PassId::new(),
            root_index,
            started_at: Utc::now(),
            finished_at: None,
            attempted: 0,
            verified: 0,
            transport_errors: 0,
            failed_indices: Vec::new(),
            completed: false,
        }
    }

    /// Records an item whose proof checked out.
    pub fn record_verified(&mut self) {
        self.attempted += 1;
        self.verified += 1;
    }

    /// Records an item that could not be fetched.
    pub fn record_transport_error(&mut self) {
        self.attempted += 1;
        self.transport_errors += 1;
    }

    /// Records a consistency failure at `index`.
    pub fn record_failure(&mut self, index: u64) {
        self.attempted += 1;
        self.failed_indices.push(index);
    }

    /// Seals the report.
    pub fn finish(&mut self, completed: bool) {
        self.completed = completed;
        self.finished_at = Some(Utc::now());
    }

    /// Returns `true` if no index failed verification in this pass.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed_indices.is_empty()
    }
}
