// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook delivery channel for WIS.
//!
//! Implements [`Deliverer`](wis_core::Deliverer) with a single multipart
//! `POST` per call: the image as the `file` part and, when the destination
//! overrides its identity, a `payload_json` part carrying `username` and
//! `avatar_url`. Transport failures are classified into the
//! [`DeliveryErrorKind`](wis_core::DeliveryErrorKind) taxonomy.

pub mod classify;
pub mod client;
pub mod form;

pub use client::WebhookClient;
