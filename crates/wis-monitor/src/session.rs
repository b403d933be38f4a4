// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inputs of a monitoring session.

use std::time::Duration;

use wis_config::WisConfig;
use wis_config::model::{FolderConfig, IdentityProfile, MonitorConfig, WebhookConfig};

/// Engine settings captured when a session starts.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSettings {
    /// Pause between scan cycles.
    pub scan_rate: Duration,
    /// Wait between detecting a file and reading it.
    pub file_delay: Duration,
    /// Per-request HTTP timeout.
    pub send_timeout: Duration,
    /// Comma-separated extension list.
    pub formats: String,
    /// Emit a debug line for every scan cycle.
    pub debug: bool,
    /// Skip the remaining destinations of a file after its first failure.
    pub stop_on_first_failure: bool,
}

impl From<&MonitorConfig> for MonitorSettings {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            scan_rate: config.scan_rate(),
            file_delay: config.file_delay(),
            send_timeout: config.send_timeout(),
            formats: config.formats.clone(),
            debug: config.debug,
            stop_on_first_failure: config.stop_on_first_failure,
        }
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self::from(&MonitorConfig::default())
    }
}

/// Everything [`Monitor::start`](crate::Monitor::start) needs.
#[derive(Debug, Clone, Default)]
pub struct SessionRequest {
    pub folders: Vec<FolderConfig>,
    pub webhooks: Vec<WebhookConfig>,
    pub profiles: Vec<IdentityProfile>,
    pub settings: MonitorSettings,
}

impl SessionRequest {
    /// Builds a request from a loaded configuration.
    pub fn from_config(config: &WisConfig) -> Self {
        Self {
            folders: config.folders.clone(),
            webhooks: config.webhooks.clone(),
            profiles: config.profiles.clone(),
            settings: MonitorSettings::from(&config.monitor),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_follow_config_defaults() {
        let settings = MonitorSettings::default();
        assert_eq!(settings.scan_rate, Duration::from_secs(15));
        assert_eq!(settings.file_delay, Duration::from_millis(800));
        assert_eq!(settings.send_timeout, Duration::from_secs(15));
        assert!(!settings.stop_on_first_failure);
    }

    #[test]
    fn request_copies_config_lists() {
        let mut config = WisConfig::default();
        config.folders.push(FolderConfig::new("/tmp/shots"));
        config.webhooks.push(WebhookConfig::new("main", "https://x/1"));
        config.monitor.debug = true;

        let request = SessionRequest::from_config(&config);
        assert_eq!(request.folders.len(), 1);
        assert_eq!(request.webhooks[0].name, "main");
        assert!(request.settings.debug);
    }
}
