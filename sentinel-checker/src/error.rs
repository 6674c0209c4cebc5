//! Error types for the checker crate.

use sentinel_core::CoreError;

/// Failures talking to the ledger.
///
/// Every variant is recoverable: the verification loop logs it, skips the
/// affected step, and retries later. None of them affect the trust state.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LedgerError {
    /// The configured ledger URL cannot be used.
    #[error("invalid ledger URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// TCP connection to the ledger could not be established.
    #[error("connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP exchange failed below the application layer.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The ledger answered with a non-success status.
    #[error("HTTP {status} from {path}: {body}")]
    Status { status: u16, path: String, body: String },

    /// The ledger did not answer within the request deadline.
    #[error("request to {path} timed out after {after:?}")]
    Timeout { path: String, after: std::time::Duration },

    /// The response body did not match the expected shape.
    #[error("malformed response from {path}: {reason}")]
    Decode { path: String, reason: String },
}

/// Errors produced while scheduling or running the verification loop.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum CheckerError {
    /// `start` was called while another `start` on the same checker is running.
    #[error("trust checker is already running")]
    AlreadyRunning,

    /// The OS entropy source could not produce a shuffle seed.
    #[error("entropy source unavailable: {0}")]
    Entropy(#[from] rand::Error),

    /// The index range cannot be held in memory on this platform.
    #[error("index range of {count} entries cannot be scheduled")]
    RangeTooLarge { count: u64 },

    /// A ledger call failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A domain invariant was violated.
    #[error(transparent)]
    Core(#[from] CoreError),
}
