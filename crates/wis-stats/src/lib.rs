// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery ledger for WIS.
//!
//! Every delivery attempt is appended to a bounded, JSON-persisted history.
//! Aggregate views (per destination, per folder, per month, ...) are computed
//! on demand from a snapshot of that history.

pub mod aggregate;
pub mod ledger;
pub mod records;

pub use aggregate::{
    DestinationStats, LabelCount, LedgerSnapshot, MAX_MONTHS, MonthBucket, SuccessRate,
};
pub use ledger::DeliveryLedger;
pub use records::{AttemptFailure, DeliveryAttempt, DeliveryRecord, ErrorRecord};
