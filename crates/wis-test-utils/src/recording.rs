// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Observer and notifier doubles that capture what the engine reports.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use wis_core::{LogKind, MonitorObserver, Notifier, NotifyOutcome};

use crate::mock_deliverer::poll_until;

/// Captures every `on_log` and `on_counters` call.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    logs: Arc<Mutex<Vec<(String, LogKind)>>>,
    counters: Arc<Mutex<Vec<(u64, u64)>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// All log lines so far, in order.
    pub fn logs(&self) -> Vec<(String, LogKind)> {
        self.logs.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Log messages of the given kind.
    pub fn messages_of(&self, kind: LogKind) -> Vec<String> {
        self.logs()
            .into_iter()
            .filter(|(_, k)| *k == kind)
            .map(|(m, _)| m)
            .collect()
    }

    /// True if some log line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.logs().iter().any(|(m, _)| m.contains(needle))
    }

    /// Number of log lines containing `needle`.
    pub fn count_containing(&self, needle: &str) -> usize {
        self.logs().iter().filter(|(m, _)| m.contains(needle)).count()
    }

    /// Every counter update so far.
    pub fn counter_updates(&self) -> Vec<(u64, u64)> {
        self.counters.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn last_counters(&self) -> Option<(u64, u64)> {
        self.counter_updates().last().copied()
    }

    /// Waits for a log line containing `needle`. Returns false on timeout.
    pub async fn wait_for_log(&self, needle: &str, timeout: Duration) -> bool {
        poll_until(timeout, || self.contains(needle)).await
    }

    /// Waits for at least `n` counter updates. Returns false on timeout.
    pub async fn wait_for_counter_updates(&self, n: usize, timeout: Duration) -> bool {
        poll_until(timeout, || self.counter_updates().len() >= n).await
    }
}

impl MonitorObserver for RecordingObserver {
    fn on_log(&self, message: &str, kind: LogKind) {
        self.logs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((message.to_string(), kind));
    }

    fn on_counters(&self, sent: u64, failed: u64) {
        self.counters
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((sent, failed));
    }
}

/// Captures every notification.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    outcomes: Arc<Mutex<Vec<NotifyOutcome>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcomes(&self) -> Vec<NotifyOutcome> {
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, outcome: NotifyOutcome) {
        self.outcomes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(outcome);
    }
}
