// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Multipart body construction for webhook uploads.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use wis_core::ResolvedIdentity;

/// MIME type used when the extension is unknown.
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Side payload sent alongside the file to override the poster identity.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct IdentityPayload<'a> {
    #[serde(skip_serializing_if = "str::is_empty")]
    pub username: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub avatar_url: &'a str,
}

impl<'a> IdentityPayload<'a> {
    /// Returns `None` when the identity would not override anything.
    pub fn from_identity(identity: Option<&'a ResolvedIdentity>) -> Option<Self> {
        let identity = identity.filter(|id| !id.is_empty())?;
        Some(Self {
            username: &identity.username,
            avatar_url: &identity.avatar_url,
        })
    }
}

/// Infers the upload MIME type from the file extension.
pub fn mime_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| FALLBACK_MIME.to_string())
}

/// File name sent in the `file` part's content disposition.
pub fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

/// Builds the multipart form for one upload.
pub fn build_form(
    path: &Path,
    data: Vec<u8>,
    identity: Option<&ResolvedIdentity>,
) -> Result<Form, reqwest::Error> {
    let file_part = Part::bytes(data)
        .file_name(upload_name(path))
        .mime_str(&mime_for(path))?;
    let mut form = Form::new().part("file", file_part);

    if let Some(payload) = IdentityPayload::from_identity(identity) {
        // Serializing two borrowed strings cannot fail.
        let json = serde_json::to_string(&payload).unwrap_or_default();
        form = form.part("payload_json", Part::text(json).mime_str("application/json")?);
    }

    Ok(form)
}
