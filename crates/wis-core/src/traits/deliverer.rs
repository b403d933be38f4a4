// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Delivery channel trait for sending one file to one webhook endpoint.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::types::{DeliveryError, DeliveryOutcome, ResolvedIdentity};

/// Sends a single file to a single HTTP endpoint.
///
/// Implementations make exactly one attempt per call. A response with a
/// non-success status is an `Ok(DeliveryOutcome::Rejected)`, while a
/// transport failure is an `Err` carrying its classification.
#[async_trait]
pub trait Deliverer: Send + Sync + 'static {
    /// Human-readable name of the implementation, used in logs.
    fn name(&self) -> &str;

    /// Delivers `file` to `url`, overriding the sender identity when given.
    async fn deliver(
        &self,
        file: &Path,
        url: &str,
        timeout: Duration,
        identity: Option<&ResolvedIdentity>,
    ) -> Result<DeliveryOutcome, DeliveryError>;
}
