// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Monitoring engine for WIS.
//!
//! A [`Monitor`] watches a set of folders for new image files and relays each
//! one to every resolved webhook destination, recording every attempt in the
//! delivery ledger. Progress is reported through a
//! [`MonitorObserver`](wis_core::MonitorObserver).

pub mod engine;
pub mod matcher;
pub mod resolve;
mod scan;
pub mod session;

pub use engine::Monitor;
pub use matcher::ImageMatcher;
pub use resolve::resolve_destinations;
pub use session::{MonitorSettings, SessionRequest};
