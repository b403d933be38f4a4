// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persisted ledger records and the attempt description they are built from.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use wis_core::types::{HTTP_ERROR_KIND, NON_2XX_DETAIL, truncate_detail};
use wis_core::DeliveryError;

/// One delivery attempt of one file to one destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    pub timestamp: DateTime<Utc>,
    /// Local calendar month of the attempt, `YYYY-MM`.
    pub month: String,
    pub file: String,
    pub webhook: String,
    pub folder: String,
    /// Lowercased extension including the dot (`.png`), empty if none.
    pub ext: String,
    pub ok: bool,
}

/// Details of a failed attempt. Not linked to its delivery record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub timestamp: DateTime<Utc>,
    pub kind: String,
    pub file: String,
    pub webhook: String,
    pub detail: String,
}

/// Why an attempt failed, as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptFailure {
    pub kind: String,
    pub detail: String,
}

impl AttemptFailure {
    /// The endpoint answered with a status outside 200/201/204.
    pub fn rejected() -> Self {
        Self {
            kind: HTTP_ERROR_KIND.to_string(),
            detail: NON_2XX_DETAIL.to_string(),
        }
    }
}

impl From<&DeliveryError> for AttemptFailure {
    fn from(err: &DeliveryError) -> Self {
        Self {
            kind: err.kind.label().to_string(),
            detail: err.detail.clone(),
        }
    }
}

/// Input to [`DeliveryLedger::record_delivery`](crate::DeliveryLedger::record_delivery).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryAttempt {
    pub file: String,
    pub webhook: String,
    pub folder: String,
    pub ext: String,
    pub failure: Option<AttemptFailure>,
}

impl DeliveryAttempt {
    pub fn succeeded(
        file: impl Into<String>,
        webhook: impl Into<String>,
        folder: impl Into<String>,
        ext: impl Into<String>,
    ) -> Self {
        Self {
            file: file.into(),
            webhook: webhook.into(),
            folder: folder.into(),
            ext: ext.into(),
            failure: None,
        }
    }

    /// Marks the attempt as failed.
    pub fn failed(mut self, failure: AttemptFailure) -> Self {
        self.failure = Some(failure);
        self
    }

    pub fn is_ok(&self) -> bool {
        self.failure.is_none()
    }

    /// Splits the attempt into the records to append, stamped with `now`.
    pub(crate) fn into_records(self, now: DateTime<Utc>) -> (DeliveryRecord, Option<ErrorRecord>) {
        let month = month_key(now);
        let error = self.failure.as_ref().map(|failure| ErrorRecord {
            timestamp: now,
            kind: failure.kind.clone(),
            file: self.file.clone(),
            webhook: self.webhook.clone(),
            detail: truncate_detail(&failure.detail),
        });
        let record = DeliveryRecord {
            timestamp: now,
            month,
            ok: self.failure.is_none(),
            file: self.file,
            webhook: self.webhook,
            folder: self.folder,
            ext: self.ext,
        };
        (record, error)
    }
}

/// `YYYY-MM` key of the local month containing `at`.
pub fn month_key(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m").to_string()
}
