//! Holiday data sources: the built-in per-year dataset and holiday-API
//! payload files used by sync

use super::entry::{HolidayEntry, SOURCE_BUILTIN, normalize_entries};
use super::merge::{HolidayApiPayload, parse_holiday_api_rows};
use crate::fallback::Provider;
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name of the built-in dataset for a year
pub fn builtin_file_name(year: i32) -> String {
    format!("cn-{}.json", year)
}

/// Read the built-in entries for a year
///
/// The file `cn-<year>.json` under `dir` must hold a JSON array of entries.
/// A missing, unreadable, slow, or non-array file yields no entries.
pub async fn load_builtin_holidays(dir: &Path, year: i32, timeout: Duration) -> Vec<HolidayEntry> {
    let path = dir.join(builtin_file_name(year));
    let content = match tokio::time::timeout(timeout, tokio::fs::read_to_string(&path)).await {
        Ok(Ok(content)) => content,
        Ok(Err(e)) => {
            tracing::debug!(path = %path.display(), error = %e, "no built-in holidays");
            return Vec::new();
        }
        Err(_) => {
            tracing::warn!(path = %path.display(), "timed out reading built-in holidays");
            return Vec::new();
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(raw) => normalize_entries(&raw, SOURCE_BUILTIN),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid built-in holiday file");
            Vec::new()
        }
    }
}

/// Holiday-API payload file, tried as one provider during sync
pub struct PayloadFileProvider {
    name: String,
    path: PathBuf,
    year: i32,
}

impl PayloadFileProvider {
    /// # Arguments
    /// * `path` - Payload file, named in failure messages by its path
    /// * `year` - Year whose rows are required
    pub fn new(path: impl Into<PathBuf>, year: i32) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            path,
            year,
        }
    }
}

#[async_trait]
impl Provider<Vec<HolidayEntry>> for PayloadFileProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn attempt(&self) -> Result<Vec<HolidayEntry>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .context("read failed")?;
        let payload: HolidayApiPayload =
            serde_json::from_str(&content).context("invalid payload")?;
        let rows = payload.rows_for(self.year);
        if rows.is_empty() {
            bail!("no data for {}", self.year);
        }
        Ok(parse_holiday_api_rows(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_builtin_reads_array() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("cn-2024.json"),
            r#"[{"date": "2024-10-01", "name": "National Day"}, {"date": "2024-09-29", "type": "workday"}]"#,
        )
        .unwrap();

        let entries = load_builtin_holidays(dir.path(), 2024, Duration::from_secs(1)).await;
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.source == SOURCE_BUILTIN));
    }

    #[tokio::test]
    async fn test_load_builtin_tolerates_bad_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("cn-2023.json"), r#"{"not": "an array"}"#).unwrap();
        fs::write(dir.path().join("cn-2022.json"), "garbage").unwrap();

        let timeout = Duration::from_secs(1);
        assert!(load_builtin_holidays(dir.path(), 2023, timeout).await.is_empty());
        assert!(load_builtin_holidays(dir.path(), 2022, timeout).await.is_empty());
        assert!(load_builtin_holidays(dir.path(), 2021, timeout).await.is_empty());
    }

    #[tokio::test]
    async fn test_payload_provider_requires_rows_for_year() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("holidayAPI.json");
        fs::write(
            &path,
            r#"{"Years": {"2024": [{"Name": "New Year", "StartDate": "2024-01-01", "EndDate": "2024-01-01", "CompDays": []}]}}"#,
        )
        .unwrap();

        let entries = PayloadFileProvider::new(&path, 2024).attempt().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "New Year");

        let err = PayloadFileProvider::new(&path, 2025).attempt().await.unwrap_err();
        assert_eq!(err.to_string(), "no data for 2025");
    }

    #[tokio::test]
    async fn test_payload_provider_missing_file() {
        let dir = TempDir::new().unwrap();
        let provider = PayloadFileProvider::new(dir.path().join("absent.json"), 2024);
        assert!(provider.attempt().await.is_err());
    }

    #[tokio::test]
    async fn test_chain_failure_names_the_cause() {
        let dir = TempDir::new().unwrap();
        let garbage = dir.path().join("garbage.json");
        fs::write(&garbage, "not json").unwrap();
        let absent = dir.path().join("absent.json");

        let chain = crate::fallback::FallbackChain::new(Duration::from_secs(1))
            .with_provider(PayloadFileProvider::new(&garbage, 2024))
            .with_provider(PayloadFileProvider::new(&absent, 2024));
        let message = chain.resolve().await.unwrap_err().to_string();
        let lines: Vec<&str> = message.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(&format!("{}: invalid payload: expected", garbage.display())));
        assert!(lines[1].starts_with(&format!("{}: read failed: ", absent.display())));
        assert!(lines[1].len() > format!("{}: read failed: ", absent.display()).len());
    }
}
