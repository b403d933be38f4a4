// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client that uploads one image to one webhook endpoint.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use wis_core::{DeliveryError, DeliveryOutcome, Deliverer, ResolvedIdentity, WisError};

use crate::classify::{classify_io, classify_reqwest};
use crate::form::build_form;

/// Webhook uploader implementing [`Deliverer`].
///
/// One client is shared by every destination of a session; the connection
/// pool is keyed by host, so destinations on the same platform reuse
/// connections. There is no client-wide timeout: each call passes its own.
#[derive(Debug, Clone)]
pub struct WebhookClient {
    client: reqwest::Client,
}

impl WebhookClient {
    /// Creates a client with the WIS user agent.
    pub fn new() -> Result<Self, WisError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("wis/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WisError::Delivery {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;
        Ok(Self::with_client(client))
    }

    /// Wraps an existing `reqwest` client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Uploads `file` to `url` in a single attempt.
    pub async fn upload(
        &self,
        file: &Path,
        url: &str,
        timeout: Duration,
        identity: Option<&ResolvedIdentity>,
    ) -> Result<DeliveryOutcome, DeliveryError> {
        let data = tokio::fs::read(file).await.map_err(|e| classify_io(&e))?;
        let size = data.len();
        let form = build_form(file, data, identity).map_err(|e| classify_reqwest(&e))?;

        let response = self
            .client
            .post(url)
            .timeout(timeout)
            .multipart(form)
            .send()
            .await
            .map_err(|e| classify_reqwest(&e))?;

        let outcome = DeliveryOutcome::from_status(response.status().as_u16());
        debug!(
            file = %file.display(),
            size,
            status = outcome.status(),
            identity = identity.is_some(),
            "webhook responded"
        );
        Ok(outcome)
    }
}

#[async_trait]
impl Deliverer for WebhookClient {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn deliver(
        &self,
        file: &Path,
        url: &str,
        timeout: Duration,
        identity: Option<&ResolvedIdentity>,
    ) -> Result<DeliveryOutcome, DeliveryError> {
        self.upload(file, url, timeout, identity).await
    }
}
