// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Callback surface through which the monitor reports progress.

use crate::types::LogKind;

/// Receives activity log lines and counter updates from the scan loop.
///
/// Both methods are invoked on the monitor's background task. Controllers
/// that own presentation state must hand the values over to their own task
/// (for example through a channel) instead of touching that state here.
pub trait MonitorObserver: Send + Sync + 'static {
    fn on_log(&self, message: &str, kind: LogKind);

    fn on_counters(&self, sent: u64, failed: u64);
}
