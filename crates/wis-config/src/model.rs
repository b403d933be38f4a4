// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for WIS.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default accepted image extensions.
pub const DEFAULT_FORMATS: &str = ".jpg,.jpeg,.png,.gif,.bmp,.webp";

/// Top-level WIS configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WisConfig {
    /// Scan loop timing and file matching.
    #[serde(default)]
    pub monitor: MonitorConfig,

    /// Notification sounds.
    #[serde(default)]
    pub sound: SoundConfig,

    /// Delivery ledger retention and persistence.
    #[serde(default)]
    pub stats: StatsConfig,

    /// Diagnostic logging.
    #[serde(default)]
    pub log: LogConfig,

    /// Folders watched for new images.
    #[serde(default)]
    pub folders: Vec<FolderConfig>,

    /// Webhook destinations every new image is sent to.
    #[serde(default)]
    pub webhooks: Vec<WebhookConfig>,

    /// Named identities that webhooks may post as.
    #[serde(default)]
    pub profiles: Vec<IdentityProfile>,
}

impl WisConfig {
    /// Looks up an identity profile by its unique name.
    pub fn profile(&self, name: &str) -> Option<&IdentityProfile> {
        self.profiles.iter().find(|p| p.name == name)
    }

    /// Webhooks that are enabled and have a URL.
    pub fn active_webhooks(&self) -> impl Iterator<Item = &WebhookConfig> {
        self.webhooks.iter().filter(|w| w.is_active())
    }
}

/// Scan loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MonitorConfig {
    /// Seconds to sleep between scan cycles.
    #[serde(default = "default_scan_rate_secs")]
    pub scan_rate_secs: f64,

    /// Per-request HTTP timeout in seconds.
    #[serde(default = "default_send_timeout_secs")]
    pub send_timeout_secs: u64,

    /// Settle delay between first seeing a file and reading it, in seconds.
    #[serde(default = "default_file_delay_secs")]
    pub file_delay_secs: f64,

    /// Comma-separated list of accepted extensions.
    #[serde(default = "default_formats")]
    pub formats: String,

    /// Emit a numbered debug line for every scan cycle.
    #[serde(default)]
    pub debug: bool,

    /// Skip the remaining webhooks for a file once one delivery fails.
    #[serde(default)]
    pub stop_on_first_failure: bool,
}

impl MonitorConfig {
    pub fn scan_rate(&self) -> Duration {
        Duration::try_from_secs_f64(self.scan_rate_secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    pub fn file_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.file_delay_secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    pub fn send_timeout(&self) -> Duration {
        Duration::from_secs(self.send_timeout_secs)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            scan_rate_secs: default_scan_rate_secs(),
            send_timeout_secs: default_send_timeout_secs(),
            file_delay_secs: default_file_delay_secs(),
            formats: default_formats(),
            debug: false,
            stop_on_first_failure: false,
        }
    }
}

fn default_scan_rate_secs() -> f64 {
    15.0
}

fn default_send_timeout_secs() -> u64 {
    15
}

fn default_file_delay_secs() -> f64 {
    0.8
}

fn default_formats() -> String {
    DEFAULT_FORMATS.to_string()
}

/// Notification sound configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SoundConfig {
    /// Play a sound after each processed file.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Playback volume between 0.0 and 1.0.
    #[serde(default = "default_volume")]
    pub volume: f32,

    /// Sound played when every attempted delivery succeeded.
    #[serde(default = "default_success_file")]
    pub success_file: String,

    /// Sound played when at least one delivery failed.
    #[serde(default = "default_failure_file")]
    pub failure_file: String,

    /// External player command; the sound file path is its only argument.
    /// Empty disables playback.
    #[serde(default)]
    pub player: String,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            volume: default_volume(),
            success_file: default_success_file(),
            failure_file: default_failure_file(),
            player: String::new(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_volume() -> f32 {
    0.8
}

fn default_success_file() -> String {
    "validation.mp3".to_string()
}

fn default_failure_file() -> String {
    "exclamation.mp3".to_string()
}

/// Delivery ledger configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StatsConfig {
    /// Ledger file path. Empty uses the platform data directory.
    #[serde(default)]
    pub path: String,

    /// Maximum delivery records kept on persist.
    #[serde(default = "default_max_sends")]
    pub max_sends: usize,

    /// Maximum error records kept on persist.
    #[serde(default = "default_max_errors")]
    pub max_errors: usize,

    /// Number of months shown in the monthly series.
    #[serde(default = "default_months")]
    pub months: usize,

    /// Persist in the background every N recorded deliveries (0 disables).
    #[serde(default = "default_autosave_every")]
    pub autosave_every: usize,
}

impl StatsConfig {
    /// Resolved ledger file location.
    pub fn ledger_path(&self) -> PathBuf {
        if !self.path.trim().is_empty() {
            return PathBuf::from(self.path.trim());
        }
        dirs::data_dir()
            .map(|p| p.join("wis").join("wis_stats.json"))
            .unwrap_or_else(|| PathBuf::from("wis_stats.json"))
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            max_sends: default_max_sends(),
            max_errors: default_max_errors(),
            months: default_months(),
            autosave_every: default_autosave_every(),
        }
    }
}

fn default_max_sends() -> usize {
    10_000
}

fn default_max_errors() -> usize {
    2_000
}

fn default_months() -> usize {
    12
}

fn default_autosave_every() -> usize {
    10
}

/// Diagnostic logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// A watched folder. Identity is the path.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct FolderConfig {
    pub path: String,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Also watch every subdirectory.
    #[serde(default)]
    pub recursive: bool,
}

impl FolderConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            enabled: true,
            recursive: false,
        }
    }
}

/// A webhook destination.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WebhookConfig {
    pub name: String,

    pub url: String,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Post as the identity named by `profile`.
    #[serde(default)]
    pub profile_enabled: bool,

    /// Name of an entry in `[[profiles]]`.
    #[serde(default)]
    pub profile: String,
}

impl WebhookConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            enabled: true,
            profile_enabled: false,
            profile: String::new(),
        }
    }

    /// Enabled and pointing somewhere.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.url.trim().is_empty()
    }

    /// The profile name to resolve, if the override is switched on.
    pub fn profile_ref(&self) -> Option<&str> {
        if self.profile_enabled && !self.profile.is_empty() {
            Some(&self.profile)
        } else {
            None
        }
    }
}

/// A named display identity (username and avatar) shared between webhooks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct IdentityProfile {
    pub name: String,

    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub avatar_url: String,
}
