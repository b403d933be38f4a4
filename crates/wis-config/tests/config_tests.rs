// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the WIS configuration system.

use std::io::Write;

use wis_config::diagnostic::ConfigError;
use wis_config::model::{DEFAULT_FORMATS, WisConfig};
use serial_test::serial;
use wis_config::{load_and_validate_path, load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_wis_config() {
    let toml = r#"
[monitor]
scan_rate_secs = 2.5
send_timeout_secs = 30
file_delay_secs = 0.2
formats = ".png, .JPG"
debug = true
stop_on_first_failure = true

[sound]
enabled = false
volume = 0.5
player = "paplay"

[stats]
path = "/tmp/wis_stats.json"
max_sends = 50
max_errors = 5
months = 6
autosave_every = 0

[log]
level = "debug"

[[folders]]
path = "/srv/screenshots"
recursive = true

[[folders]]
path = "/srv/old"
enabled = false

[[webhooks]]
name = "Team"
url = "https://chat.example.com/api/webhooks/1/abc"
profile_enabled = true
profile = "camera"

[[profiles]]
name = "camera"
username = "Camera Bot"
avatar_url = "https://example.com/cam.png"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.monitor.scan_rate_secs, 2.5);
    assert_eq!(config.monitor.send_timeout_secs, 30);
    assert_eq!(config.monitor.file_delay_secs, 0.2);
    assert_eq!(config.monitor.formats, ".png, .JPG");
    assert!(config.monitor.debug);
    assert!(config.monitor.stop_on_first_failure);
    assert!(!config.sound.enabled);
    assert_eq!(config.sound.volume, 0.5);
    assert_eq!(config.sound.player, "paplay");
    assert_eq!(config.stats.max_sends, 50);
    assert_eq!(config.stats.max_errors, 5);
    assert_eq!(config.stats.months, 6);
    assert_eq!(config.stats.autosave_every, 0);
    assert_eq!(config.log.level, "debug");
    assert_eq!(config.folders.len(), 2);
    assert!(config.folders[0].recursive);
    assert!(config.folders[0].enabled);
    assert!(!config.folders[1].enabled);
    assert_eq!(config.webhooks[0].profile_ref(), Some("camera"));
    assert_eq!(config.profile("camera").unwrap().username, "Camera Bot");
    assert_eq!(config.active_webhooks().count(), 1);
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.monitor.scan_rate_secs, 15.0);
    assert_eq!(config.monitor.send_timeout_secs, 15);
    assert_eq!(config.monitor.file_delay_secs, 0.8);
    assert_eq!(config.monitor.formats, DEFAULT_FORMATS);
    assert!(!config.monitor.debug);
    assert!(!config.monitor.stop_on_first_failure);
    assert!(config.sound.enabled);
    assert_eq!(config.sound.volume, 0.8);
    assert_eq!(config.stats.max_sends, 10_000);
    assert_eq!(config.stats.max_errors, 2_000);
    assert_eq!(config.stats.months, 12);
    assert_eq!(config.stats.autosave_every, 10);
    assert_eq!(config.log.level, "info");
    assert!(config.folders.is_empty());
    assert!(config.webhooks.is_empty());
    assert!(config.profiles.is_empty());
}

/// Unknown field in [monitor] is rejected.
#[test]
fn unknown_field_in_monitor_produces_error() {
    let toml = r#"
[monitor]
scan_rat_secs = 3.0
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("scan_rat_secs"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unknown key inside a webhook table becomes an UnknownKey diagnostic with a suggestion.
#[test]
fn unknown_webhook_key_suggests_correction() {
    let toml = r#"
[[webhooks]]
name = "a"
url = "https://example.com"
profil = "bot"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    let found = errors.iter().any(|e| match e {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => key == "profil" && suggestion.as_deref() == Some("profile"),
        _ => false,
    });
    assert!(found, "expected UnknownKey with suggestion, got: {errors:?}");
}

/// A webhook without a URL is a missing-key diagnostic.
#[test]
fn webhook_without_url_is_missing_key() {
    let toml = r#"
[[webhooks]]
name = "a"
"#;

    let errors = load_and_validate_str(toml).expect_err("url is required");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::MissingKey { key } if key.ends_with("url"))),
        "got: {errors:?}"
    );
}

/// Wrong value type is reported as InvalidType.
#[test]
fn wrong_type_is_invalid_type() {
    let toml = r#"
[monitor]
send_timeout_secs = "fast"
"#;

    let errors = load_and_validate_str(toml).expect_err("string is not an integer");
    assert!(
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::InvalidType { .. })),
        "got: {errors:?}"
    );
}

/// Parsed config that violates semantics fails validation.
#[test]
fn semantic_errors_surface_from_load_and_validate() {
    let toml = r#"
[[folders]]
path = "/a"

[[folders]]
path = "/a"
"#;

    let errors = load_and_validate_str(toml).expect_err("duplicate folder");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("duplicate folder path"))
    ));
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r##"
[theme]
bg = "#0f1117"
"##;

    let err = load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("theme"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Dotted overrides (what `WIS_MONITOR_SCAN_RATE_SECS` becomes) win over TOML.
#[test]
fn dotted_override_wins_over_toml() {
    use figment::{
        Figment,
        providers::{Format, Serialized, Toml},
    };

    let config: WisConfig = Figment::new()
        .merge(Serialized::defaults(WisConfig::default()))
        .merge(Toml::string("[monitor]\nscan_rate_secs = 5.0\n"))
        .merge(("monitor.scan_rate_secs", 1.0))
        .extract()
        .expect("should merge override");

    assert_eq!(config.monitor.scan_rate_secs, 1.0);
}

/// Loading from an explicit path reads the file.
#[test]
#[serial]
fn load_from_explicit_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[log]\nlevel = \"warn\"").unwrap();

    let config = load_and_validate_path(file.path()).expect("file should load");
    assert_eq!(config.log.level, "warn");
}

/// Missing config files are silently skipped (Figment's Toml::file() behavior).
#[test]
#[serial]
fn missing_config_file_yields_defaults() {
    let config = load_and_validate_path(std::path::Path::new("/nonexistent/wis.toml"))
        .expect("missing file should be silently skipped");
    assert_eq!(config.monitor.scan_rate_secs, 15.0);
}

/// `WIS_*` variables override file values, section by section.
#[test]
#[serial]
fn env_vars_override_file_values() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[monitor]\nscan_rate_secs = 5.0\n\n[stats]\nmax_sends = 50").unwrap();

    // SAFETY: env-reading tests in this binary are serialized.
    unsafe {
        std::env::set_var("WIS_MONITOR_SCAN_RATE_SECS", "2.5");
        std::env::set_var("WIS_STATS_AUTOSAVE_EVERY", "0");
    }
    let result = load_and_validate_path(file.path());
    unsafe {
        std::env::remove_var("WIS_MONITOR_SCAN_RATE_SECS");
        std::env::remove_var("WIS_STATS_AUTOSAVE_EVERY");
    }

    let config = result.expect("env overrides should apply");
    assert_eq!(config.monitor.scan_rate_secs, 2.5);
    assert_eq!(config.stats.max_sends, 50);
    assert_eq!(config.stats.autosave_every, 0);
}
