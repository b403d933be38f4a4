// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits injected into the monitoring engine.
//!
//! The engine only talks to the outside world through these seams, so a
//! session can be driven by scripted implementations in tests.

pub mod deliverer;
pub mod notifier;
pub mod observer;

pub use deliverer::Deliverer;
pub use notifier::{NullNotifier, Notifier};
pub use observer::MonitorObserver;
