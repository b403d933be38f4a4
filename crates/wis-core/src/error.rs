// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the WIS workspace.

use thiserror::Error;

/// The primary error type used across WIS crates.
///
/// Per-attempt delivery failures are not represented here; they travel as
/// [`DeliveryError`](crate::types::DeliveryError) values so the monitor can
/// record them without unwinding.
#[derive(Debug, Error)]
pub enum WisError {
    /// Configuration errors (invalid TOML, bad values, unknown profile).
    #[error("configuration error: {0}")]
    Config(String),

    /// Ledger or settings persistence errors (I/O, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Delivery channel setup errors (HTTP client construction).
    #[error("delivery error: {message}")]
    Delivery {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A monitoring session is already active.
    #[error("monitoring is already running")]
    AlreadyRunning,

    /// No destination is enabled, so a session cannot start.
    #[error("no enabled webhook destinations")]
    NoEnabledDestinations,

    /// Every configured folder is disabled or missing on disk.
    #[error("no valid folders to monitor")]
    NoValidFolders,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WisError {
    /// Returns true for the errors that reject a session start.
    ///
    /// These are configuration problems surfaced to the user as a single
    /// warning, never fatal to the host process.
    pub fn is_start_rejection(&self) -> bool {
        matches!(
            self,
            WisError::AlreadyRunning | WisError::NoEnabledDestinations | WisError::NoValidFolders
        )
    }
}

impl From<std::io::Error> for WisError {
    fn from(e: std::io::Error) -> Self {
        WisError::Storage {
            source: Box::new(e),
        }
    }
}
