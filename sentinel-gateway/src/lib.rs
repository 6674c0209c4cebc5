//! HTTP status gateway for the Sentinel ledger trust checker.
//!
//! Runs the verification loop in the background and exposes its trust
//! signal over HTTP until the process receives Ctrl-C.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use sentinel_checker::{HttpLedgerClient, TrustChecker};
use tracing::info;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::routes::create_router;

/// Run the checker and the status API until shutdown.
///
/// On Ctrl-C the server stops accepting requests, the checker is asked to
/// stop, and the call returns once both have finished.
///
/// # Errors
/// Returns [`GatewayError::Ledger`] for an unusable ledger URL,
/// [`GatewayError::Bind`] if the listen address is taken, and
/// [`GatewayError::Serve`] / [`GatewayError::Task`] if either half fails.
pub async fn run(config: GatewayConfig) -> Result<(), GatewayError> {
    let client = HttpLedgerClient::new(&config.ledger_url)?.with_timeout(config.ledger_timeout());
    let checker = Arc::new(TrustChecker::new(client, &config.checker_config()));

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|source| GatewayError::Bind { addr: config.listen_addr.clone(), source })?;

    let runner = Arc::clone(&checker);
    let checker_task = tokio::spawn(async move { runner.start().await });

    info!(
        addr = %config.listen_addr,
        ledger = %config.ledger_url,
        interval_secs = config.interval_secs,
        "sentinel-gateway listening"
    );

    let app = create_router(Arc::clone(&checker));
    let shutdown = {
        let checker = Arc::clone(&checker);
        async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            info!("shutdown signal received");
            checker.stop();
        }
    };

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(GatewayError::Serve);

    checker.stop();
    let checked = match checker_task.await {
        Ok(result) => result.map_err(GatewayError::from),
        Err(e) => Err(GatewayError::Task(e.to_string())),
    };

    served.and(checked)
}
