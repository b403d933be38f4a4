// SPDX-FileCopyrightText: 2026 WIS Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregate views over a point-in-time copy of the ledger.

use std::collections::HashMap;
use std::fmt;

use chrono::{Datelike, Local, NaiveDate};
use serde::{Serialize, Serializer};

use crate::records::{DeliveryRecord, ErrorRecord};

/// Longest monthly series that will be built: one hundred years.
pub const MAX_MONTHS: usize = 1200;

/// A label with the number of records carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// One calendar month of the monthly series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    /// `YYYY-MM`
    pub key: String,
    /// Short display label, e.g. `Mar 26`.
    pub label: String,
    pub count: usize,
}

/// Share of successful attempts, or an explicit marker when there were none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SuccessRate {
    Percent(f64),
    NoData,
}

impl SuccessRate {
    pub fn from_counts(succeeded: usize, failed: usize) -> Self {
        let total = succeeded + failed;
        if total == 0 {
            SuccessRate::NoData
        } else {
            SuccessRate::Percent(100.0 * succeeded as f64 / total as f64)
        }
    }
}

impl fmt::Display for SuccessRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuccessRate::Percent(p) => write!(f, "{p:.1}%"),
            SuccessRate::NoData => f.write_str("—"),
        }
    }
}

impl Serialize for SuccessRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SuccessRate::Percent(p) => serializer.serialize_f64(*p),
            SuccessRate::NoData => serializer.serialize_none(),
        }
    }
}

/// Per-destination success/failure totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DestinationStats {
    pub name: String,
    pub succeeded: usize,
    pub failed: usize,
    pub success_rate: SuccessRate,
}

impl DestinationStats {
    fn new(name: String, succeeded: usize, failed: usize) -> Self {
        Self {
            name,
            succeeded,
            failed,
            success_rate: SuccessRate::from_counts(succeeded, failed),
        }
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// A copy of both ledger lists. All aggregates are pure functions of it.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    pub sends: Vec<DeliveryRecord>,
    pub errors: Vec<ErrorRecord>,
}

impl LedgerSnapshot {
    /// Attempts per destination, successes and failures alike.
    pub fn counts_by_destination(&self) -> Vec<LabelCount> {
        count_by(self.sends.iter().map(|s| s.webhook.as_str()))
    }

    /// Attempts per source folder, successes and failures alike.
    pub fn counts_by_folder(&self) -> Vec<LabelCount> {
        count_by(self.sends.iter().map(|s| s.folder.as_str()))
    }

    /// Successful deliveries per file extension.
    pub fn counts_by_extension(&self) -> Vec<LabelCount> {
        count_by(
            self.sends
                .iter()
                .filter(|s| s.ok)
                .map(|s| if s.ext.is_empty() { "(none)" } else { s.ext.as_str() }),
        )
    }

    /// Error records per failure kind.
    pub fn counts_by_error_kind(&self) -> Vec<LabelCount> {
        count_by(self.errors.iter().map(|e| e.kind.as_str()))
    }

    /// The `n` calendar months ending with the current local month, oldest first.
    pub fn monthly_series(&self, n: usize) -> Vec<MonthBucket> {
        self.monthly_series_at(n, Local::now().date_naive())
    }

    /// The `n` calendar months ending with the month containing `today`.
    /// `n` is capped at [`MAX_MONTHS`].
    pub fn monthly_series_at(&self, n: usize, today: NaiveDate) -> Vec<MonthBucket> {
        let mut per_month: HashMap<&str, usize> = HashMap::new();
        for send in &self.sends {
            *per_month.entry(send.month.as_str()).or_default() += 1;
        }

        let n = n.min(MAX_MONTHS) as i32;
        let (year, month) = (today.year(), today.month() as i32);
        (0..n)
            .rev()
            .filter_map(|offset| {
                // Months since year 0, stepped back by the offset.
                let index = year * 12 + (month - 1) - offset;
                let first = NaiveDate::from_ymd_opt(index.div_euclid(12), index.rem_euclid(12) as u32 + 1, 1)?;
                let key = first.format("%Y-%m").to_string();
                let count = per_month.get(key.as_str()).copied().unwrap_or(0);
                Some(MonthBucket {
                    label: first.format("%b %y").to_string(),
                    key,
                    count,
                })
            })
            .collect()
    }

    /// Success/failure totals per destination, most successes first.
    pub fn destination_breakdown(&self) -> Vec<DestinationStats> {
        let mut totals: HashMap<&str, (usize, usize)> = HashMap::new();
        for send in &self.sends {
            let entry = totals.entry(send.webhook.as_str()).or_default();
            if send.ok {
                entry.0 += 1;
            } else {
                entry.1 += 1;
            }
        }

        let mut rows: Vec<DestinationStats> = totals
            .into_iter()
            .map(|(name, (ok, failed))| DestinationStats::new(name.to_string(), ok, failed))
            .collect();
        rows.sort_by(|a, b| b.succeeded.cmp(&a.succeeded).then_with(|| a.name.cmp(&b.name)));
        rows
    }

    /// Totals for a single destination. Unknown names report [`SuccessRate::NoData`].
    pub fn destination_stats(&self, name: &str) -> DestinationStats {
        let (succeeded, failed) = self
            .sends
            .iter()
            .filter(|s| s.webhook == name)
            .fold((0, 0), |(ok, fail), s| if s.ok { (ok + 1, fail) } else { (ok, fail + 1) });
        DestinationStats::new(name.to_string(), succeeded, failed)
    }
}

fn count_by<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<LabelCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut out: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn send(webhook: &str, folder: &str, ext: &str, month: &str, ok: bool) -> DeliveryRecord {
        DeliveryRecord {
            timestamp: Utc::now(),
            month: month.into(),
            file: "f.png".into(),
            webhook: webhook.into(),
            folder: folder.into(),
            ext: ext.into(),
            ok,
        }
    }

    fn error(kind: &str) -> ErrorRecord {
        ErrorRecord {
            timestamp: Utc::now(),
            kind: kind.into(),
            file: "f.png".into(),
            webhook: "A".into(),
            detail: String::new(),
        }
    }

    fn lc(label: &str, count: usize) -> LabelCount {
        LabelCount {
            label: label.into(),
            count,
        }
    }

    #[test]
    fn destination_counts_sum_to_record_count() {
        let snap = LedgerSnapshot {
            sends: vec![
                send("A", "x", ".png", "2026-03", true),
                send("A", "x", ".png", "2026-03", false),
                send("B", "y", ".jpg", "2026-03", true),
            ],
            errors: vec![error("Timeout")],
        };
        let by_dest = snap.counts_by_destination();
        assert_eq!(by_dest, vec![lc("A", 2), lc("B", 1)]);
        assert_eq!(by_dest.iter().map(|c| c.count).sum::<usize>(), snap.sends.len());
        assert_eq!(snap.counts_by_folder(), vec![lc("x", 2), lc("y", 1)]);
    }

    #[test]
    fn extension_counts_only_successes() {
        let snap = LedgerSnapshot {
            sends: vec![
                send("A", "x", ".png", "2026-03", true),
                send("A", "x", ".png", "2026-03", false),
                send("A", "x", ".gif", "2026-03", false),
            ],
            errors: vec![],
        };
        assert_eq!(snap.counts_by_extension(), vec![lc(".png", 1)]);
    }

    #[test]
    fn ties_are_ordered_by_name() {
        let snap = LedgerSnapshot {
            sends: vec![],
            errors: vec![error("Timeout"), error("Connection Error"), error("Timeout")],
        };
        assert_eq!(
            snap.counts_by_error_kind(),
            vec![lc("Timeout", 2), lc("Connection Error", 1)]
        );

        let snap = LedgerSnapshot {
            sends: vec![send("b", "x", ".png", "m", true), send("a", "x", ".png", "m", true)],
            errors: vec![],
        };
        assert_eq!(snap.counts_by_destination(), vec![lc("a", 1), lc("b", 1)]);
    }

    #[test]
    fn monthly_series_crosses_year_boundary() {
        let snap = LedgerSnapshot {
            sends: vec![
                send("A", "x", ".png", "2025-12", true),
                send("A", "x", ".png", "2026-02", false),
                send("A", "x", ".png", "2026-02", true),
                send("A", "x", ".png", "2024-01", true),
            ],
            errors: vec![],
        };
        let today = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        let series = snap.monthly_series_at(4, today);

        let keys: Vec<&str> = series.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, ["2025-11", "2025-12", "2026-01", "2026-02"]);
        let counts: Vec<usize> = series.iter().map(|b| b.count).collect();
        assert_eq!(counts, [0, 1, 0, 2]);
        assert_eq!(series[0].label, "Nov 25");
        assert_eq!(series[3].label, "Feb 26");
    }

    #[test]
    fn monthly_series_of_zero_months_is_empty() {
        let snap = LedgerSnapshot::default();
        assert!(snap.monthly_series(0).is_empty());
        assert_eq!(snap.monthly_series(12).len(), 12);
    }

    #[test]
    fn monthly_series_length_is_capped() {
        let snap = LedgerSnapshot::default();
        let today = NaiveDate::from_ymd_opt(2026, 2, 14).unwrap();
        let series = snap.monthly_series_at(usize::MAX, today);
        assert_eq!(series.len(), MAX_MONTHS);
        assert_eq!(series[MAX_MONTHS - 1].key, "2026-02");
        assert_eq!(series[0].key, "1926-03");

        let wrapped = snap.monthly_series_at(u32::MAX as usize + 3, today);
        assert_eq!(wrapped.len(), MAX_MONTHS);
    }

    #[test]
    fn breakdown_and_rates() {
        let snap = LedgerSnapshot {
            sends: vec![
                send("A", "x", ".png", "m", true),
                send("A", "x", ".png", "m", false),
                send("B", "x", ".png", "m", true),
                send("B", "x", ".png", "m", true),
                send("C", "x", ".png", "m", false),
            ],
            errors: vec![],
        };
        let rows = snap.destination_breakdown();
        let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["B", "A", "C"]);
        assert_eq!(rows[1].success_rate.to_string(), "50.0%");
        assert_eq!(rows[2].success_rate, SuccessRate::Percent(0.0));

        let unknown = snap.destination_stats("nobody");
        assert_eq!(unknown.total(), 0);
        assert_eq!(unknown.success_rate, SuccessRate::NoData);
        assert_eq!(unknown.success_rate.to_string(), "—");
    }

    #[test]
    fn success_rate_serializes_as_number_or_null() {
        assert_eq!(serde_json::to_string(&SuccessRate::Percent(75.0)).unwrap(), "75.0");
        assert_eq!(serde_json::to_string(&SuccessRate::NoData).unwrap(), "null");
    }
}
