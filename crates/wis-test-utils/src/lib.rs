// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for WIS engine tests.
//!
//! Provides scripted and recording implementations of the engine's
//! capability traits for fast, deterministic tests without a network.
//!
//! # Components
//!
//! - [`MockDeliverer`] - Deliverer with per-URL scripted outcomes and call capture
//! - [`RecordingObserver`] - Captures activity log lines and counter updates
//! - [`RecordingNotifier`] - Captures notification outcomes

pub mod mock_deliverer;
pub mod recording;

pub use mock_deliverer::{DeliveryCall, MockDeliverer, MockResponse};
pub use recording::{RecordingNotifier, RecordingObserver};
