//! Merging of day-keyed holiday sources
//!
//! Buckets are applied in call order and the last bucket holding a day key
//! wins, so callers pass the least authoritative source first (built-in
//! dataset, then cached sync result, then a fresh remote result). Output is
//! sorted by day key, which for `YYYY-MM-DD` is also chronological order.

use super::entry::{DEFAULT_HOLIDAY_NAME, HolidayEntry, HolidayKind, SOURCE_REMOTE_CACHE};
use crate::date::date_range;
use chrono::{Datelike, Months, NaiveDate};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Day key -> entry
pub type HolidayMap = BTreeMap<String, HolidayEntry>;

/// Merge buckets of entries, last write wins per day key
pub fn merge_entries<'a, I>(buckets: I) -> Vec<HolidayEntry>
where
    I: IntoIterator<Item = &'a [HolidayEntry]>,
{
    into_map(buckets).into_values().collect()
}

/// Like [`merge_entries`], keyed by day
pub fn into_map<'a, I>(buckets: I) -> HolidayMap
where
    I: IntoIterator<Item = &'a [HolidayEntry]>,
{
    let mut map = HolidayMap::new();
    for bucket in buckets {
        for entry in bucket {
            map.insert(entry.date.clone(), entry.clone());
        }
    }
    map
}

/// Union of several per-year maps; later maps win on shared keys
pub fn merge_holiday_maps(maps: impl IntoIterator<Item = HolidayMap>) -> HolidayMap {
    let mut merged = HolidayMap::new();
    for map in maps {
        merged.extend(map);
    }
    merged
}

/// Years touched by a calendar view spanning `[start, end]`
pub fn visible_years(start: NaiveDate, end: NaiveDate) -> Vec<i32> {
    let mut years = BTreeSet::new();
    let mut cursor = start;
    while cursor <= end {
        years.insert(cursor.year());
        match cursor.checked_add_months(Months::new(1)) {
            Some(next) => cursor = next,
            None => break,
        }
    }
    if start <= end {
        years.insert(end.year());
    }
    years.into_iter().collect()
}

/// One holiday period in a holiday-API payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HolidayApiRow {
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "StartDate")]
    pub start_date: String,
    #[serde(rename = "EndDate")]
    pub end_date: String,
    /// Make-up working days attached to the period
    #[serde(rename = "CompDays")]
    pub comp_days: Vec<String>,
}

/// Holiday-API payload: `{"Years": {"2024": [row, ...], ...}}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HolidayApiPayload {
    #[serde(rename = "Years")]
    pub years: HashMap<String, Vec<HolidayApiRow>>,
}

impl HolidayApiPayload {
    pub fn rows_for(&self, year: i32) -> &[HolidayApiRow] {
        self.years
            .get(&year.to_string())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn parse_day(value: &str) -> Option<NaiveDate> {
    let day = value.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Expand payload rows into day entries
///
/// Each row yields one `holiday` entry per day from `StartDate` to `EndDate`
/// inclusive and one `workday` entry per comp day, all with source
/// `remote-cache`. Rows with unreadable dates contribute only their readable
/// comp days.
pub fn parse_holiday_api_rows(rows: &[HolidayApiRow]) -> Vec<HolidayEntry> {
    let mut entries = Vec::new();
    for row in rows {
        let name = row
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_HOLIDAY_NAME);

        if let (Some(start), Some(end)) = (parse_day(&row.start_date), parse_day(&row.end_date)) {
            for day in date_range(start, end) {
                entries.push(HolidayEntry::new(
                    day.format("%Y-%m-%d").to_string(),
                    HolidayKind::holiday,
                    name,
                    SOURCE_REMOTE_CACHE,
                ));
            }
        }

        for comp in &row.comp_days {
            if let Some(day) = parse_day(comp) {
                entries.push(HolidayEntry::new(
                    day.format("%Y-%m-%d").to_string(),
                    HolidayKind::workday,
                    format!("{} (make-up workday)", name),
                    SOURCE_REMOTE_CACHE,
                ));
            }
        }
    }
    entries
}
