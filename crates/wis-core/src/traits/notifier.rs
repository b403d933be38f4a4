// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Notification hook fired once per processed file.

use crate::types::NotifyOutcome;

/// Signals the outcome of a file's fan-out (e.g. by playing a sound).
///
/// `notify` is called from the scan loop and must return immediately;
/// implementations that do real work spawn it and forget it.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, outcome: NotifyOutcome);
}

/// A notifier that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _outcome: NotifyOutcome) {}
}
