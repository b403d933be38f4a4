// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock delivery channel for deterministic engine tests.
//!
//! `MockDeliverer` implements `Deliverer` with outcomes scripted per URL and
//! captures every call in order for assertions.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use wis_core::{
    DeliveryError, DeliveryErrorKind, DeliveryOutcome, Deliverer, ResolvedIdentity,
};

/// Scripted result for a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// The endpoint answers with this HTTP status.
    Status(u16),
    /// The transport fails with this classification.
    Error(DeliveryErrorKind),
}

/// One captured `deliver` call.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryCall {
    pub file: PathBuf,
    pub url: String,
    pub timeout: Duration,
    pub identity: Option<ResolvedIdentity>,
}

/// A mock deliverer for testing.
///
/// URLs without a script answer `204`.
#[derive(Clone, Default)]
pub struct MockDeliverer {
    scripts: Arc<Mutex<HashMap<String, MockResponse>>>,
    calls: Arc<Mutex<Vec<DeliveryCall>>>,
    latency: Arc<Mutex<Duration>>,
}

impl MockDeliverer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the response for `url`.
    pub fn respond(&self, url: impl Into<String>, response: MockResponse) -> &Self {
        self.scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.into(), response);
        self
    }

    /// Delay every call by `latency` before answering.
    pub fn with_latency(self, latency: Duration) -> Self {
        *self.latency.lock().unwrap_or_else(PoisonError::into_inner) = latency;
        self
    }

    /// All calls so far, in order.
    pub fn calls(&self) -> Vec<DeliveryCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// URLs called so far, in order.
    pub fn called_urls(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.url).collect()
    }

    /// Waits until at least `n` calls were made. Returns false on timeout.
    pub async fn wait_for_calls(&self, n: usize, timeout: Duration) -> bool {
        poll_until(timeout, || self.call_count() >= n).await
    }
}

#[async_trait]
impl Deliverer for MockDeliverer {
    fn name(&self) -> &str {
        "mock-deliverer"
    }

    async fn deliver(
        &self,
        file: &Path,
        url: &str,
        timeout: Duration,
        identity: Option<&ResolvedIdentity>,
    ) -> Result<DeliveryOutcome, DeliveryError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(DeliveryCall {
                file: file.to_path_buf(),
                url: url.to_string(),
                timeout,
                identity: identity.cloned(),
            });

        let latency = *self.latency.lock().unwrap_or_else(PoisonError::into_inner);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }

        let response = self
            .scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
            .unwrap_or(MockResponse::Status(204));
        match response {
            MockResponse::Status(status) => Ok(DeliveryOutcome::from_status(status)),
            MockResponse::Error(kind) => Err(DeliveryError::new(kind, "scripted failure")),
        }
    }
}

/// Polls `condition` every 10ms until it holds or `timeout` elapses.
pub(crate) async fn poll_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
