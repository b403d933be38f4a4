// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `wis run` command implementation.
//!
//! Wires the webhook client, the delivery ledger, the sound notifier and the
//! activity printer into a [`Monitor`], starts a session from the loaded
//! configuration and keeps it running until SIGINT or SIGTERM.

use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use tracing::info;
use wis_config::WisConfig;
use wis_config::loader::user_config_path;
use wis_core::WisError;
use wis_monitor::{Monitor, SessionRequest};
use wis_stats::DeliveryLedger;
use wis_webhook::WebhookClient;

use crate::activity::{ChannelObserver, print_activity};
use crate::shutdown;
use crate::sound::CommandNotifier;

/// Runs the monitor until a shutdown signal arrives.
pub async fn run_monitor(mut config: WisConfig, debug: bool) -> Result<(), WisError> {
    if debug {
        config.monitor.debug = true;
    }
    init_tracing(&config.log.level);

    let client = WebhookClient::new()?;
    let config_path = user_config_path();
    let sound_dir = config_path.parent().unwrap_or(Path::new("."));
    let notifier = CommandNotifier::from_config(&config.sound, sound_dir);

    let (observer, rx) = ChannelObserver::new();
    let printer = tokio::spawn(print_activity(rx, std::io::stdout().is_terminal()));

    let monitor = Monitor::new(
        Arc::new(client),
        notifier,
        DeliveryLedger::load(config.stats.ledger_path(), &config.stats),
        Arc::new(observer),
    );

    if let Err(e) = monitor.start(SessionRequest::from_config(&config)).await {
        // Let the printer flush the rejection lines before reporting.
        drop(monitor);
        let _ = printer.await;
        return Err(e);
    }

    let cancel = shutdown::install_signal_handler();
    cancel.cancelled().await;

    monitor.stop();
    monitor.stopped().await;
    let counters = monitor.counters();
    info!(
        sent = counters.sent,
        failed = counters.failed,
        "session finished"
    );

    monitor.ledger().persist();
    drop(monitor);
    let _ = printer.await;
    Ok(())
}

/// Initialize the tracing subscriber with an env filter.
///
/// Diagnostics go to stderr so they never interleave with the activity log.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "wis={log_level},wis_monitor={log_level},wis_stats={log_level},wis_webhook={log_level},warn"
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}
