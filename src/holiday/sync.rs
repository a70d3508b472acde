use super::cache::HolidayCache;
use super::entry::HolidayEntry;
use super::merge::merge_entries;
use super::sources::PayloadFileProvider;
use crate::config::HolidayConfig;
use crate::fallback::FallbackChain;
use crate::storage::Storage;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Outcome of a successful sync
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub year: i32,
    /// Entries stored for the year
    pub count: usize,
    /// Provider that supplied them
    pub source: String,
    pub updated_at: String,
}

/// Provider chain over the configured payload files, in configuration order
pub fn payload_chain(config: &HolidayConfig, year: i32) -> FallbackChain<Vec<HolidayEntry>> {
    let timeout = Duration::from_millis(config.timeout_ms);
    let mut chain = FallbackChain::new(timeout);
    for path in &config.payload_files {
        chain.push(Box::new(PayloadFileProvider::new(path, year)));
    }
    chain
}

/// Fetch a year's holidays from the first working provider and cache them
///
/// On success the year in the cache is replaced by the merged entries and the
/// cache is stamped with `now` and the provider name. On failure the cache is
/// untouched and the error lists each provider's failure on its own line.
pub async fn sync_holidays(
    storage: &Storage,
    year: i32,
    chain: &FallbackChain<Vec<HolidayEntry>>,
    now: DateTime<Utc>,
) -> Result<SyncReport> {
    let resolved = chain.resolve().await?;
    let entries = merge_entries([resolved.value.as_slice()]);
    let count = entries.len();

    let mut cache = HolidayCache::load(storage);
    cache.put_year(year, entries, resolved.source.clone(), now);
    cache.save(storage)?;
    tracing::info!(year, count, source = %resolved.source, "holidays synced");

    Ok(SyncReport {
        year,
        count,
        source: resolved.source,
        updated_at: cache.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    const PAYLOAD: &str = r#"{"Years": {"2024": [
        {"Name": "National Day", "StartDate": "2024-10-01", "EndDate": "2024-10-03", "CompDays": ["2024-09-29"]}
    ]}}"#;

    #[tokio::test]
    async fn test_sync_falls_through_to_working_file() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.json");
        fs::write(&good, PAYLOAD).unwrap();
        let config = HolidayConfig {
            payload_files: vec![dir.path().join("missing.json"), good.clone()],
            ..HolidayConfig::default()
        };
        let storage = Storage::new(dir.path().join("data"));
        let now = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();

        let report = sync_holidays(&storage, 2024, &payload_chain(&config, 2024), now)
            .await
            .unwrap();
        assert_eq!(report.count, 4);
        assert_eq!(report.source, good.display().to_string());
        assert_eq!(report.updated_at, "2024-09-01T00:00:00.000Z");

        let cache = HolidayCache::load(&storage);
        let dates: Vec<&str> = cache.year(2024).iter().map(|e| e.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-09-29", "2024-10-01", "2024-10-02", "2024-10-03"]);
    }

    #[tokio::test]
    async fn test_sync_failure_leaves_cache_untouched() {
        let dir = TempDir::new().unwrap();
        let only_2023 = dir.path().join("old.json");
        fs::write(&only_2023, r#"{"Years": {"2023": []}}"#).unwrap();
        let config = HolidayConfig {
            payload_files: vec![only_2023, dir.path().join("missing.json")],
            ..HolidayConfig::default()
        };
        let storage = Storage::new(dir.path());
        let now = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();

        let err = sync_holidays(&storage, 2024, &payload_chain(&config, 2024), now)
            .await
            .unwrap_err();
        let message = err.to_string();
        assert_eq!(message.lines().count(), 2);
        assert!(message.lines().next().unwrap().ends_with("old.json: no data for 2024"));
        assert_eq!(HolidayCache::load(&storage), HolidayCache::default());
    }
}
