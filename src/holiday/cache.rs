use super::entry::{HolidayEntry, SOURCE_REMOTE_CACHE, normalize_entries};
use crate::storage::{Storage, keys};
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Last successful holiday sync, persisted under [`keys::HOLIDAY_CACHE`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCache {
    /// RFC 3339 time of the last sync, empty when never synced
    #[serde(rename = "updatedAtISO", default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Year (as text) -> entries
    #[serde(default)]
    pub years: BTreeMap<String, Vec<HolidayEntry>>,
}

impl HolidayCache {
    /// Build a cache from a raw blob
    ///
    /// A blob whose `years` is not an object yields an empty cache. Entries
    /// inside each year are normalized individually; bad ones are skipped.
    pub fn from_value(raw: &Value) -> Self {
        let Some(years) = raw.get("years").and_then(Value::as_object) else {
            return Self::default();
        };

        let years = years
            .iter()
            .map(|(year, entries)| (year.clone(), normalize_entries(entries, SOURCE_REMOTE_CACHE)))
            .collect();
        let text = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            updated_at: text("updatedAtISO").unwrap_or_default(),
            source: text("source"),
            years,
        }
    }

    pub fn load(storage: &Storage) -> Self {
        storage
            .get_value(keys::HOLIDAY_CACHE)
            .map(|raw| Self::from_value(&raw))
            .unwrap_or_default()
    }

    pub fn save(&self, storage: &Storage) -> Result<()> {
        storage.set_state(keys::HOLIDAY_CACHE, self)
    }

    /// Cached entries for a year
    pub fn year(&self, year: i32) -> &[HolidayEntry] {
        self.years
            .get(&year.to_string())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Replace one year's entries and stamp the sync
    pub fn put_year(
        &mut self,
        year: i32,
        entries: Vec<HolidayEntry>,
        source: impl Into<String>,
        now: DateTime<Utc>,
    ) {
        self.years.insert(year.to_string(), entries);
        self.source = Some(source.into());
        self.updated_at = now.to_rfc3339_opts(SecondsFormat::Millis, true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::holiday::entry::HolidayKind;
    use chrono::TimeZone;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_malformed_years_gives_empty_cache() {
        assert_eq!(HolidayCache::from_value(&json!({"years": []})), HolidayCache::default());
        assert_eq!(HolidayCache::from_value(&json!("nope")), HolidayCache::default());
    }

    #[test]
    fn test_from_value_normalizes_entries() {
        let raw = json!({
            "updatedAtISO": "2024-09-01T00:00:00.000Z",
            "years": {"2024": [{"date": "2024-10-01"}, {"name": "no date"}], "2025": "junk"}
        });
        let cache = HolidayCache::from_value(&raw);
        assert_eq!(cache.updated_at, "2024-09-01T00:00:00.000Z");
        assert_eq!(cache.year(2024).len(), 1);
        assert_eq!(cache.year(2024)[0].source, SOURCE_REMOTE_CACHE);
        assert!(cache.year(2025).is_empty());
        assert!(cache.year(2030).is_empty());
    }

    #[test]
    fn test_put_year_and_persist() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(dir.path());
        assert_eq!(HolidayCache::load(&storage), HolidayCache::default());

        let now = Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap();
        let mut cache = HolidayCache::default();
        cache.put_year(
            2024,
            vec![HolidayEntry::new("2024-10-01", HolidayKind::holiday, "National Day", SOURCE_REMOTE_CACHE)],
            "mirror-a",
            now,
        );
        cache.save(&storage).unwrap();

        let loaded = HolidayCache::load(&storage);
        assert_eq!(loaded, cache);
        assert_eq!(loaded.updated_at, "2024-09-01T08:00:00.000Z");
        assert_eq!(loaded.source.as_deref(), Some("mirror-a"));
    }
}
