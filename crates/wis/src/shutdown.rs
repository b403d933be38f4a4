// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Signal handling for `wis run`.
//!
//! Installs handlers for SIGTERM and SIGINT (Ctrl+C), triggering a
//! [`CancellationToken`] that the run command waits on before stopping the
//! monitor.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Installs signal handlers for SIGTERM and SIGINT.
///
/// Returns a [`CancellationToken`] that is cancelled when either signal is received.
pub fn install_signal_handler() -> CancellationToken {
    let token = CancellationToken::new();
    let token_clone = token.clone();

    tokio::spawn(async move {
        wait_for_signal().await;
        token_clone.cancel();
        debug!("shutdown signal handler completed");
    });

    token
}

async fn wait_for_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("received SIGINT (Ctrl+C), stopping"),
                    _ = sigterm.recv() => info!("received SIGTERM, stopping"),
                }
                return;
            }
            Err(e) => warn!(error = %e, "failed to install SIGTERM handler, Ctrl+C only"),
        }
    }

    if let Err(e) = ctrl_c.await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        // Without a signal source there is nothing to wait for.
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, stopping");
}
