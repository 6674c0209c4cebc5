//! Gateway configuration read from the environment.

use std::time::Duration;

use sentinel_checker::CheckerConfig;

use crate::error::GatewayError;

/// Default address the status API listens on.
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:3457";

/// Default base URL of the ledger API.
pub const DEFAULT_LEDGER_URL: &str = "http://127.0.0.1:3323";

/// Default seconds between passes and retries.
pub const DEFAULT_INTERVAL_SECS: u64 = 10;

/// Default seconds a single ledger request may take.
pub const DEFAULT_LEDGER_TIMEOUT_SECS: u64 = 30;

/// Process configuration for the gateway binary.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct GatewayConfig {
    /// `host:port` for the status API (`SENTINEL_LISTEN_ADDR`).
    pub listen_addr: String,
    /// Base URL of the ledger API (`SENTINEL_LEDGER_URL`).
    pub ledger_url: String,
    /// Seconds between passes and retries (`SENTINEL_INTERVAL_SECS`).
    pub interval_secs: u64,
    /// Deadline for one ledger request (`SENTINEL_LEDGER_TIMEOUT_SECS`).
    pub ledger_timeout_secs: u64,
}

impl GatewayConfig {
    /// Read the configuration from process environment variables.
    ///
    /// # Errors
    /// Returns [`GatewayError::Config`] if `SENTINEL_INTERVAL_SECS` or
    /// `SENTINEL_LEDGER_TIMEOUT_SECS` is not a positive integer.
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    /// Returns [`GatewayError::Config`] if `SENTINEL_INTERVAL_SECS` or
    /// `SENTINEL_LEDGER_TIMEOUT_SECS` is not a positive integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GatewayError> {
        let listen_addr = lookup("SENTINEL_LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_owned());
        let ledger_url = lookup("SENTINEL_LEDGER_URL").unwrap_or_else(|| DEFAULT_LEDGER_URL.to_owned());

        let interval_secs = positive_secs(&lookup, "SENTINEL_INTERVAL_SECS", DEFAULT_INTERVAL_SECS)?;
        let ledger_timeout_secs =
            positive_secs(&lookup, "SENTINEL_LEDGER_TIMEOUT_SECS", DEFAULT_LEDGER_TIMEOUT_SECS)?;

        Ok(Self { listen_addr, ledger_url, interval_secs, ledger_timeout_secs })
    }

    /// Checker settings derived from this configuration.
    #[must_use]
    pub fn checker_config(&self) -> CheckerConfig {
        CheckerConfig::new().with_interval(Duration::from_secs(self.interval_secs))
    }

    /// Per-request deadline for the ledger client.
    #[must_use]
    pub fn ledger_timeout(&self) -> Duration {
        Duration::from_secs(self.ledger_timeout_secs)
    }
}

/// Read `var` as a whole number of seconds greater than zero.
fn positive_secs(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    default: u64,
) -> Result<u64, GatewayError> {
    let Some(raw) = lookup(var) else {
        return Ok(default);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(GatewayError::Config {
            var: var.to_owned(),
            reason: "must be greater than zero".to_owned(),
        }),
        Ok(secs) => Ok(secs),
        Err(e) => Err(GatewayError::Config {
            var: var.to_owned(),
            reason: format!("{raw:?} is not a number: {e}"),
        }),
    }
}
