// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Maps transport errors onto the delivery failure taxonomy.

use std::error::Error as StdError;
use std::io;

use wis_core::{DeliveryError, DeliveryErrorKind};

/// Classifies a failed `reqwest` send.
pub fn classify_reqwest(err: &reqwest::Error) -> DeliveryError {
    DeliveryError::new(reqwest_kind(err), err.to_string())
}

/// Classifies a failure to read the file before sending.
///
/// The kind is named after the I/O error kind (`NotFound`,
/// `PermissionDenied`, ...).
pub fn classify_io(err: &io::Error) -> DeliveryError {
    DeliveryError::new(DeliveryErrorKind::Other(format!("{:?}", err.kind())), err.to_string())
}

fn reqwest_kind(err: &reqwest::Error) -> DeliveryErrorKind {
    if err.is_timeout() {
        return DeliveryErrorKind::Timeout;
    }
    if err.is_connect() {
        return DeliveryErrorKind::Connection;
    }
    if let Some(kind) = io_kind_in_chain(err) {
        if kind == io::ErrorKind::TimedOut {
            return DeliveryErrorKind::Timeout;
        }
        if is_connection_io_kind(kind) {
            return DeliveryErrorKind::Connection;
        }
    }

    let name = if err.is_builder() {
        "BuilderError"
    } else if err.is_redirect() {
        "RedirectError"
    } else if err.is_body() {
        "BodyError"
    } else if err.is_decode() {
        "DecodeError"
    } else {
        "RequestError"
    };
    DeliveryErrorKind::Other(name.to_string())
}

/// Finds the first `io::Error` in the source chain.
fn io_kind_in_chain(err: &reqwest::Error) -> Option<io::ErrorKind> {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            return Some(io_err.kind());
        }
        source = cause.source();
    }
    None
}

pub(crate) fn is_connection_io_kind(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::UnexpectedEof
    )
}
