use crate::todo::value_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name given to entries stored without one
pub const DEFAULT_HOLIDAY_NAME: &str = "Holiday";

pub const SOURCE_BUILTIN: &str = "builtin";
pub const SOURCE_REMOTE_CACHE: &str = "remote-cache";

/// Day annotation type
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HolidayKind {
    /// Day off
    #[default]
    holiday,
    /// Make-up working day (e.g. a weekend swapped for a holiday bridge)
    workday,
}

/// One day-keyed holiday annotation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayEntry {
    /// Day key, `YYYY-MM-DD`
    pub date: String,
    #[serde(rename = "type")]
    pub kind: HolidayKind,
    pub name: String,
    /// Where the entry came from (`builtin`, `remote-cache`, ...)
    pub source: String,
}

impl HolidayEntry {
    pub fn new(
        date: impl Into<String>,
        kind: HolidayKind,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            kind,
            name: name.into(),
            source: source.into(),
        }
    }

    /// Four-digit year of the day key, if it has one
    pub fn year(&self) -> Option<i32> {
        self.date.get(..4)?.parse().ok()
    }
}

/// Normalize a raw entry
///
/// `date` is cut to its first 10 characters; a type other than `workday` means
/// `holiday`; a blank name becomes [`DEFAULT_HOLIDAY_NAME`]; a missing source
/// becomes `default_source`.
///
/// # Returns
/// `None` when the value is not an object or has no date
pub fn normalize_entry(raw: &Value, default_source: &str) -> Option<HolidayEntry> {
    let fields = raw.as_object()?;
    let date = value_text(fields.get("date"))?;
    let date: String = date.trim().chars().take(10).collect();
    if date.is_empty() {
        return None;
    }

    let kind = match fields.get("type").and_then(Value::as_str) {
        Some("workday") => HolidayKind::workday,
        _ => HolidayKind::holiday,
    };
    let name = value_text(fields.get("name"))
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_HOLIDAY_NAME.to_string());
    let source = value_text(fields.get("source"))
        .filter(|source| !source.trim().is_empty())
        .unwrap_or_else(|| default_source.to_string());

    Some(HolidayEntry {
        date,
        kind,
        name,
        source,
    })
}

/// Normalize a JSON array of entries; anything else yields nothing
pub fn normalize_entries(raw: &Value, default_source: &str) -> Vec<HolidayEntry> {
    match raw {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| normalize_entry(item, default_source))
            .collect(),
        _ => Vec::new(),
    }
}
