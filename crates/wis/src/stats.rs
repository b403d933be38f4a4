// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `wis stats` command implementation.
//!
//! Loads the delivery ledger and prints its aggregate views. With `--json`
//! the same views are emitted as one JSON document for scripting.

use std::io::IsTerminal;

use serde::Serialize;
use wis_config::WisConfig;
use wis_core::WisError;
use wis_stats::{DeliveryLedger, DestinationStats, LabelCount, LedgerSnapshot, MonthBucket, SuccessRate};

/// Width of the longest bar in the monthly chart.
const BAR_WIDTH: usize = 30;

/// Structured output for `--json` mode.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    pub ledger_path: String,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub success_rate: SuccessRate,
    pub destinations: Vec<DestinationStats>,
    pub folders: Vec<LabelCount>,
    pub extensions: Vec<LabelCount>,
    pub error_kinds: Vec<LabelCount>,
    pub monthly: Vec<MonthBucket>,
}

impl StatsReport {
    pub fn build(snapshot: &LedgerSnapshot, ledger_path: String, months: usize) -> Self {
        let succeeded = snapshot.sends.iter().filter(|s| s.ok).count();
        let failed = snapshot.sends.len() - succeeded;
        Self {
            ledger_path,
            total: snapshot.sends.len(),
            succeeded,
            failed,
            success_rate: SuccessRate::from_counts(succeeded, failed),
            destinations: snapshot.destination_breakdown(),
            folders: snapshot.counts_by_folder(),
            extensions: snapshot.counts_by_extension(),
            error_kinds: snapshot.counts_by_error_kind(),
            monthly: snapshot.monthly_series(months),
        }
    }
}

/// Run the `wis stats` command.
pub fn run_stats(config: &WisConfig, json: bool, months: Option<usize>) -> Result<(), WisError> {
    let path = config.stats.ledger_path();
    let ledger = DeliveryLedger::load(&path, &config.stats);
    let report = StatsReport::build(
        &ledger.snapshot(),
        path.display().to_string(),
        months.unwrap_or(config.stats.months),
    );

    if json {
        let out = serde_json::to_string_pretty(&report)
            .map_err(|e| WisError::Internal(format!("failed to serialize stats: {e}")))?;
        println!("{out}");
    } else {
        let use_color = std::io::stdout().is_terminal();
        print!("{}", render_report(&report, use_color));
    }
    Ok(())
}

/// Run the `wis stats reset` command.
pub fn run_reset(config: &WisConfig) -> Result<(), WisError> {
    let path = config.stats.ledger_path();
    let ledger = DeliveryLedger::load(&path, &config.stats);
    let cleared = ledger.len();
    ledger.clear();
    ledger.try_persist()?;
    println!("wis: cleared {cleared} delivery record(s) in {}", path.display());
    Ok(())
}

/// Renders the human-readable report.
pub fn render_report(report: &StatsReport, use_color: bool) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str("  wis stats\n");
    out.push_str(&format!("  {}\n", "-".repeat(50)));
    out.push_str(&format!("    Ledger:     {}\n", report.ledger_path));

    let rate = report.success_rate.to_string();
    let rate = if use_color {
        use colored::Colorize;
        match report.success_rate {
            SuccessRate::Percent(p) if p >= 90.0 => rate.green().to_string(),
            SuccessRate::Percent(_) => rate.yellow().to_string(),
            SuccessRate::NoData => rate.dimmed().to_string(),
        }
    } else {
        rate
    };
    out.push_str(&format!(
        "    Deliveries: {} ({} ok, {} failed, {rate})\n",
        report.total, report.succeeded, report.failed
    ));

    out.push_str("\n  Destinations\n");
    if report.destinations.is_empty() {
        out.push_str("    (none)\n");
    }
    let name_width = report
        .destinations
        .iter()
        .map(|d| d.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);
    for row in &report.destinations {
        out.push_str(&format!(
            "    {:<name_width$}  {:>6} ok  {:>6} failed  {:>7}\n",
            row.name,
            row.succeeded,
            row.failed,
            row.success_rate.to_string(),
        ));
    }

    push_counts(&mut out, "Folders", &report.folders);
    push_counts(&mut out, "Extensions", &report.extensions);
    push_counts(&mut out, "Errors", &report.error_kinds);

    out.push_str("\n  Monthly\n");
    let peak = report.monthly.iter().map(|m| m.count).max().unwrap_or(0);
    for bucket in &report.monthly {
        out.push_str(&format!(
            "    {}  {:<BAR_WIDTH$}  {}\n",
            bucket.label,
            bar(bucket.count, peak),
            bucket.count
        ));
    }
    out.push('\n');
    out
}

fn push_counts(out: &mut String, title: &str, counts: &[LabelCount]) {
    out.push_str(&format!("\n  {title}\n"));
    if counts.is_empty() {
        out.push_str("    (none)\n");
        return;
    }
    for entry in counts {
        out.push_str(&format!("    {:>6}  {}\n", entry.count, entry.label));
    }
}

/// A bar proportional to `count / peak`, at least one cell for non-zero counts.
fn bar(count: usize, peak: usize) -> String {
    if count == 0 || peak == 0 {
        return String::new();
    }
    let cells = (count * BAR_WIDTH).div_ceil(peak).clamp(1, BAR_WIDTH);
    "█".repeat(cells)
}
