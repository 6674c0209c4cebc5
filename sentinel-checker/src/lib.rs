//! Background trust checker for tamper-evident, append-only ledgers.
//!
//! Continuously re-verifies previously committed entries in a random order
//! and keeps a sticky trust flag that drops to `false` on the first
//! consistency failure.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod checker;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod http_client;
pub mod scheduler;
pub mod trust;
pub mod wire;

pub use checker::{PassOutcome, TrustChecker};
pub use client::LedgerClient;
pub use clock::{Clock, Wake};
pub use config::CheckerConfig;
pub use error::{CheckerError, LedgerError};
pub use http_client::{HttpLedgerClient, DEFAULT_REQUEST_TIMEOUT};
pub use scheduler::{permutation, EntropySource, IndexScheduler, OsEntropy, Seed};
pub use trust::TrustState;
