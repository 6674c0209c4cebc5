//! Core types for the Sentinel ledger trust checker.
//!
//! Defines the values that flow through one verification pass: the ledger
//! root snapshot, per-entry verification results, and the pass report.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod error;
pub mod ledger;
pub mod pass;

pub use error::CoreError;
pub use ledger::{Digest, Root, VerifiedItem};
pub use pass::{PassId, PassReport};
