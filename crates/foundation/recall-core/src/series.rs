//! Yearly count series derived from `ReportReceivedDate`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use std::collections::BTreeMap;

/// Calendar year -> number of recalls reported that year, ascending by year
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct YearlyCountSeries {
    counts: BTreeMap<i32, usize>,
}

impl YearlyCountSeries {
    /// Group raw date strings by year; unparseable dates are dropped
    pub fn from_dates<'a>(dates: impl IntoIterator<Item = &'a str>) -> Self {
        let mut counts = BTreeMap::new();
        for year in dates.into_iter().filter_map(parse_report_year) {
            *counts.entry(year).or_insert(0) += 1;
        }
        Self { counts }
    }

    pub fn from_counts(counts: impl IntoIterator<Item = (i32, usize)>) -> Self {
        Self {
            counts: counts.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn last_year(&self) -> Option<i32> {
        self.counts.keys().next_back().copied()
    }

    pub fn get(&self, year: i32) -> Option<usize> {
        self.counts.get(&year).copied()
    }

    /// `(year, count)` pairs as floats for fitting and plotting
    pub fn points(&self) -> Vec<(i32, f64)> {
        self.counts.iter().map(|(&y, &c)| (y, c as f64)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, usize)> + '_ {
        self.counts.iter().map(|(&y, &c)| (y, c))
    }
}

/// Extract the calendar year from an NHTSA report date.
///
/// Handles `DD/MM/YYYY` (current API), `MM/DD/YYYY`, ISO dates, RFC 3339
/// timestamps and the legacy `/Date(1453784400000-0500)/` form.
pub fn parse_report_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Some(millis) = legacy_millis(raw) {
        return DateTime::<Utc>::from_timestamp_millis(millis).map(|dt| dt.year());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.year());
    }

    for fmt in ["%d/%m/%Y", "%m/%d/%Y", "%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date.year());
        }
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|dt| dt.year())
}

fn legacy_millis(raw: &str) -> Option<i64> {
    let inner = raw.strip_prefix("/Date(")?.strip_suffix(")/")?;
    // offset suffix (+hhmm / -hhmm) follows the millis
    let end = inner
        .char_indices()
        .skip(1)
        .find(|(_, c)| *c == '+' || *c == '-')
        .map_or(inner.len(), |(i, _)| i);
    inner[..end].parse().ok()
}
