// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the delivery channel, ledger, and monitor.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use thiserror::Error;

/// Maximum length, in characters, of a recorded error detail.
pub const MAX_ERROR_DETAIL: usize = 120;

/// Ledger error kind recorded for a non-2xx response.
pub const HTTP_ERROR_KIND: &str = "HTTP Error";

/// Ledger detail recorded for a non-2xx response.
pub const NON_2XX_DETAIL: &str = "Non-2xx response";

/// Severity of an activity log line emitted by the monitor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Ok,
    Err,
    Warn,
    Info,
    Debug,
}

impl LogKind {
    /// Single-character marker used when rendering the activity log.
    pub fn icon(self) -> &'static str {
        match self {
            LogKind::Ok => "✓",
            LogKind::Err => "✗",
            LogKind::Warn => "!",
            LogKind::Info => "·",
            LogKind::Debug => ">",
        }
    }
}

/// Lifecycle state of the monitoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MonitorState {
    Idle,
    Running,
    Stopping,
}

/// Display identity materialized from a profile at session start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    pub username: String,
    pub avatar_url: String,
}

impl ResolvedIdentity {
    /// True when neither field would override anything.
    pub fn is_empty(&self) -> bool {
        self.username.is_empty() && self.avatar_url.is_empty()
    }
}

/// A webhook destination with its identity override already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDestination {
    pub name: String,
    pub url: String,
    /// `None` means the webhook's own identity is used.
    pub identity: Option<ResolvedIdentity>,
}

/// Result of a delivery attempt that reached the endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The endpoint answered 200, 201 or 204.
    Delivered { status: u16 },
    /// The endpoint answered with any other status.
    Rejected { status: u16 },
}

impl DeliveryOutcome {
    /// Classifies an HTTP status code.
    pub fn from_status(status: u16) -> Self {
        if matches!(status, 200 | 201 | 204) {
            DeliveryOutcome::Delivered { status }
        } else {
            DeliveryOutcome::Rejected { status }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }

    pub fn status(&self) -> u16 {
        match self {
            DeliveryOutcome::Delivered { status } | DeliveryOutcome::Rejected { status } => *status,
        }
    }
}

/// Classification of a transport-level delivery failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryErrorKind {
    /// The request exceeded the caller-supplied timeout.
    Timeout,
    /// The connection could not be established or was lost.
    Connection,
    /// Anything else, named after the underlying error type.
    Other(String),
}

impl DeliveryErrorKind {
    /// Label stored in the ledger's error records.
    pub fn label(&self) -> &str {
        match self {
            DeliveryErrorKind::Timeout => "Timeout",
            DeliveryErrorKind::Connection => "Connection Error",
            DeliveryErrorKind::Other(name) => name,
        }
    }
}

impl std::fmt::Display for DeliveryErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A classified transport failure with a bounded human-readable detail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {detail}")]
pub struct DeliveryError {
    pub kind: DeliveryErrorKind,
    pub detail: String,
}

impl DeliveryError {
    /// Builds an error, truncating `detail` to [`MAX_ERROR_DETAIL`] characters.
    pub fn new(kind: DeliveryErrorKind, detail: impl AsRef<str>) -> Self {
        Self {
            kind,
            detail: truncate_detail(detail.as_ref()),
        }
    }
}

/// Truncates a detail string to [`MAX_ERROR_DETAIL`] characters on a char boundary.
pub fn truncate_detail(detail: &str) -> String {
    detail.chars().take(MAX_ERROR_DETAIL).collect()
}

/// Aggregate outcome of one file's fan-out, used to pick a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum NotifyOutcome {
    AllDelivered,
    SomeFailed,
}

impl NotifyOutcome {
    pub fn from_all_ok(all_ok: bool) -> Self {
        if all_ok {
            NotifyOutcome::AllDelivered
        } else {
            NotifyOutcome::SomeFailed
        }
    }
}

/// Running per-session totals reported to the controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SessionCounters {
    pub sent: u64,
    pub failed: u64,
}
