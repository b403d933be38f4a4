// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as positive intervals, unique folder paths, and profile references.

use std::collections::HashSet;

use crate::diagnostic::ConfigError;
use crate::model::WisConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &WisConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    let monitor = &config.monitor;
    if !(monitor.scan_rate_secs.is_finite() && monitor.scan_rate_secs > 0.0) {
        fail(format!(
            "monitor.scan_rate_secs must be greater than 0, got {}",
            monitor.scan_rate_secs
        ));
    }

    if !(monitor.file_delay_secs.is_finite() && monitor.file_delay_secs >= 0.0) {
        fail(format!(
            "monitor.file_delay_secs must be non-negative, got {}",
            monitor.file_delay_secs
        ));
    }

    if monitor.send_timeout_secs == 0 {
        fail("monitor.send_timeout_secs must be at least 1".to_string());
    }

    if monitor.formats.split(',').all(|f| f.trim().is_empty()) {
        fail("monitor.formats must list at least one extension".to_string());
    }

    if !(0.0..=1.0).contains(&config.sound.volume) {
        fail(format!(
            "sound.volume must be between 0.0 and 1.0, got {}",
            config.sound.volume
        ));
    }

    // Folder identity is the path.
    let mut seen_paths = HashSet::new();
    for (i, folder) in config.folders.iter().enumerate() {
        if folder.path.trim().is_empty() {
            fail(format!("folders[{i}].path must not be empty"));
        } else if !seen_paths.insert(folder.path.as_str()) {
            fail(format!(
                "duplicate folder path `{}` in [[folders]] array",
                folder.path
            ));
        }
    }

    let mut seen_profiles = HashSet::new();
    for (i, profile) in config.profiles.iter().enumerate() {
        if profile.name.trim().is_empty() {
            fail(format!("profiles[{i}].name must not be empty"));
        } else if !seen_profiles.insert(profile.name.as_str()) {
            fail(format!(
                "duplicate profile name `{}` in [[profiles]] array",
                profile.name
            ));
        }
    }

    for (i, webhook) in config.webhooks.iter().enumerate() {
        if webhook.name.trim().is_empty() {
            fail(format!("webhooks[{i}].name must not be empty"));
        }

        let url = webhook.url.trim();
        if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
            fail(format!(
                "webhooks[{i}].url `{url}` must start with http:// or https://"
            ));
        }

        if let Some(profile) = webhook.profile_ref()
            && !seen_profiles.contains(profile)
        {
            fail(format!(
                "webhooks[{i}] (`{}`) uses unknown profile `{profile}`",
                webhook.name
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
