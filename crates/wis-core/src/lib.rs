// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for WIS, the webhook image sender.
//!
//! This crate provides the error type, the shared value types, and the
//! capability traits ([`Deliverer`], [`Notifier`], [`MonitorObserver`]) that
//! the monitoring engine is assembled from.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::WisError;
pub use types::{
    DeliveryError, DeliveryErrorKind, DeliveryOutcome, LogKind, MonitorState, NotifyOutcome,
    ResolvedDestination, ResolvedIdentity, SessionCounters,
};

pub use traits::{Deliverer, MonitorObserver, Notifier, NullNotifier};
