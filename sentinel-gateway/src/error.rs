//! Error types for the gateway crate.

use sentinel_checker::{CheckerError, LedgerError};

/// Errors that stop the gateway process.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// An environment variable held an unusable value.
    #[error("invalid configuration {var}: {reason}")]
    Config { var: String, reason: String },

    /// The ledger client could not be built from the configuration.
    #[error("ledger client error: {0}")]
    Ledger(#[from] LedgerError),

    /// The trust checker ended with an error.
    #[error("trust checker error: {0}")]
    Checker(#[from] CheckerError),

    /// The listen address could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server stopped with an I/O error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    /// The checker task panicked or was aborted.
    #[error("trust checker task failed: {0}")]
    Task(String),
}
