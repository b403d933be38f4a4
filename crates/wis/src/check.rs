// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `wis config check` command implementation.
//!
//! Checks the loaded configuration against the local environment: the
//! config files in effect, watched folders, webhook destinations, the
//! ledger location and the sound setup.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use wis_config::WisConfig;
use wis_config::loader::{LOCAL_CONFIG_FILE, SYSTEM_CONFIG_PATH, user_config_path};
use wis_core::WisError;
use wis_monitor::{ImageMatcher, resolve_destinations};

/// Status of a configuration check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully.
    Pass,
    /// Check passed with a warning.
    Warn,
    /// Check failed; `wis run` would refuse to start or lose data.
    Fail,
}

/// Result of a single check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check.
    pub name: String,
    /// Check status.
    pub status: CheckStatus,
    /// Human-readable message.
    pub message: String,
    /// Duration the check took.
    pub duration: Duration,
}

impl CheckResult {
    fn new(name: &str, status: CheckStatus, message: impl Into<String>, start: Instant) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            duration: start.elapsed(),
        }
    }
}

/// Run the `wis config check` command.
///
/// With `--plain`, disables colored output. Fails when any check fails.
pub async fn run_check(
    config: &WisConfig,
    explicit_path: Option<&Path>,
    plain: bool,
) -> Result<(), WisError> {
    let use_color = !plain && std::io::stdout().is_terminal();
    let results = collect_checks(config, explicit_path).await;

    println!();
    println!("  wis config check");
    println!("  {}", "-".repeat(50));
    for result in &results {
        println!("{}", render_result(result, use_color));
    }
    println!();

    let fail_count = results
        .iter()
        .filter(|r| r.status == CheckStatus::Fail)
        .count();
    let warn_count = results
        .iter()
        .filter(|r| r.status == CheckStatus::Warn)
        .count();
    let issues = fail_count + warn_count;
    if issues > 0 {
        let issue_word = if issues == 1 { "issue" } else { "issues" };
        println!("  {issues} {issue_word} found.");
    } else {
        println!("  All checks passed.");
    }
    println!();

    if fail_count > 0 {
        return Err(WisError::Config(format!(
            "{fail_count} configuration check(s) failed"
        )));
    }
    Ok(())
}

/// Runs every check in display order.
pub async fn collect_checks(config: &WisConfig, explicit_path: Option<&Path>) -> Vec<CheckResult> {
    vec![
        check_sources(explicit_path),
        check_folders(config),
        check_formats(config),
        check_webhooks(config),
        check_ledger(&config.stats.ledger_path()).await,
        check_sound(config, &sound_base_dir()),
    ]
}

fn sound_base_dir() -> PathBuf {
    user_config_path()
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn check_sources(explicit_path: Option<&Path>) -> CheckResult {
    let start = Instant::now();
    let candidates: Vec<PathBuf> = match explicit_path {
        Some(path) => vec![path.to_path_buf()],
        None => vec![
            PathBuf::from(SYSTEM_CONFIG_PATH),
            user_config_path(),
            PathBuf::from(LOCAL_CONFIG_FILE),
        ],
    };
    let found: Vec<String> = candidates
        .iter()
        .filter(|p| p.is_file())
        .map(|p| p.display().to_string())
        .collect();

    if found.is_empty() {
        CheckResult::new(
            "config",
            CheckStatus::Warn,
            "no config file found, using defaults",
            start,
        )
    } else {
        CheckResult::new("config", CheckStatus::Pass, found.join(", "), start)
    }
}

fn check_folders(config: &WisConfig) -> CheckResult {
    let start = Instant::now();
    let enabled: Vec<_> = config.folders.iter().filter(|f| f.enabled).collect();
    if enabled.is_empty() {
        return CheckResult::new("folders", CheckStatus::Fail, "no enabled folders", start);
    }

    let missing: Vec<&str> = enabled
        .iter()
        .filter(|f| !Path::new(&f.path).is_dir())
        .map(|f| f.path.as_str())
        .collect();
    let present = enabled.len() - missing.len();

    if present == 0 {
        CheckResult::new(
            "folders",
            CheckStatus::Fail,
            format!("none of {} folder(s) exist", enabled.len()),
            start,
        )
    } else if !missing.is_empty() {
        CheckResult::new(
            "folders",
            CheckStatus::Warn,
            format!("{present} watched, missing: {}", missing.join(", ")),
            start,
        )
    } else {
        CheckResult::new(
            "folders",
            CheckStatus::Pass,
            format!("{present} watched"),
            start,
        )
    }
}

fn check_formats(config: &WisConfig) -> CheckResult {
    let start = Instant::now();
    let matcher = ImageMatcher::from_formats(&config.monitor.formats);
    if matcher.is_empty() {
        return CheckResult::new("formats", CheckStatus::Fail, "no extensions accepted", start);
    }
    let mut extensions: Vec<&str> = matcher.extensions().collect();
    extensions.sort_unstable();
    CheckResult::new("formats", CheckStatus::Pass, extensions.join(" "), start)
}

fn check_webhooks(config: &WisConfig) -> CheckResult {
    let start = Instant::now();
    let destinations = resolve_destinations(&config.webhooks, &config.profiles);
    if destinations.is_empty() {
        return CheckResult::new(
            "webhooks",
            CheckStatus::Fail,
            "no enabled webhooks with a URL",
            start,
        );
    }

    let with_identity = destinations.iter().filter(|d| d.identity.is_some()).count();
    let names: Vec<&str> = destinations.iter().map(|d| d.name.as_str()).collect();
    let mut message = format!("{} active: {}", destinations.len(), names.join(", "));
    if with_identity > 0 {
        message.push_str(&format!(" ({with_identity} with identity)"));
    }
    CheckResult::new("webhooks", CheckStatus::Pass, message, start)
}

/// The ledger directory must exist (or be creatable) and accept writes.
async fn check_ledger(path: &Path) -> CheckResult {
    let start = Instant::now();
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if let Err(e) = tokio::fs::create_dir_all(&dir).await {
        return CheckResult::new(
            "ledger",
            CheckStatus::Fail,
            format!("cannot create {}: {e}", dir.display()),
            start,
        );
    }

    let marker = dir.join(".wis-write-check");
    match tokio::fs::write(&marker, b"").await {
        Ok(()) => {
            let _ = tokio::fs::remove_file(&marker).await;
            CheckResult::new(
                "ledger",
                CheckStatus::Pass,
                path.display().to_string(),
                start,
            )
        }
        Err(e) => CheckResult::new(
            "ledger",
            CheckStatus::Fail,
            format!("{} is not writable: {e}", dir.display()),
            start,
        ),
    }
}

fn check_sound(config: &WisConfig, base_dir: &Path) -> CheckResult {
    let start = Instant::now();
    let sound = &config.sound;
    if !sound.enabled {
        return CheckResult::new("sound", CheckStatus::Pass, "disabled", start);
    }
    if sound.player.trim().is_empty() {
        return CheckResult::new(
            "sound",
            CheckStatus::Warn,
            "enabled but no player configured",
            start,
        );
    }

    let missing: Vec<String> = [&sound.success_file, &sound.failure_file]
        .into_iter()
        .map(|file| base_dir.join(file))
        .filter(|path| !path.is_file())
        .map(|path| path.display().to_string())
        .collect();
    if missing.is_empty() {
        CheckResult::new(
            "sound",
            CheckStatus::Pass,
            format!("{} at {:.0}%", sound.player.trim(), sound.volume * 100.0),
            start,
        )
    } else {
        CheckResult::new(
            "sound",
            CheckStatus::Warn,
            format!("missing: {}", missing.join(", ")),
            start,
        )
    }
}

fn render_result(result: &CheckResult, use_color: bool) -> String {
    let duration_ms = result.duration.as_millis();
    if use_color {
        use colored::Colorize;
        let (symbol, message) = match result.status {
            CheckStatus::Pass => ("✓".green(), result.message.normal()),
            CheckStatus::Warn => ("!".yellow(), result.message.yellow()),
            CheckStatus::Fail => ("✗".red(), result.message.red()),
        };
        format!(
            "    {symbol} {:<10} {message} ({duration_ms}ms)",
            result.name
        )
    } else {
        let tag = match result.status {
            CheckStatus::Pass => "[OK]  ",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
        };
        format!(
            "    {tag} {:<10} {} ({duration_ms}ms)",
            result.name, result.message
        )
    }
}
