//! Common test utilities for integration tests
#![allow(dead_code)]

use bxg_tools::{AppConfig, HolidayConfig, Planner};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a test planner backed by a temporary data directory
pub fn get_test_planner() -> (Planner, TempDir) {
    let dir = TempDir::new().unwrap();
    let planner = Planner::new(dir.path().join("data")).unwrap();
    (planner, dir)
}

/// Create a test planner whose timezone is UTC, so instants read as written
pub fn get_utc_planner() -> (Planner, TempDir) {
    let dir = TempDir::new().unwrap();
    let config = AppConfig::from_toml(r#"timezone = "UTC""#).unwrap();
    let planner = Planner::with_config(dir.path().join("data"), &config).unwrap();
    (planner, dir)
}

/// Create a planner using the given holiday sources
pub fn get_holiday_planner(dir: &TempDir, holiday: HolidayConfig) -> Planner {
    let config = AppConfig {
        timezone: Some("Asia/Shanghai".to_string()),
        holiday,
        ..AppConfig::default()
    };
    Planner::with_config(dir.path().join("data"), &config).unwrap()
}

/// Extract the ID from a "... created with ID: <id> (...)" response
pub fn extract_id_from_response(response: &str) -> String {
    if let Some(start) = response.find("ID: ") {
        let id_part = &response[start + 4..];
        if let Some(end) = id_part.find(" (") {
            return id_part[..end].trim().to_string();
        }
        return id_part.trim().to_string();
    }
    response
        .split_whitespace()
        .last()
        .unwrap_or("")
        .to_string()
}

/// Write a file under `dir` and return its path
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Holiday-API payload covering the 2024 National Day week
pub const NATIONAL_DAY_PAYLOAD: &str = r#"{
  "Years": {
    "2024": [
      {"Name": "National Day", "StartDate": "2024-10-01", "EndDate": "2024-10-07", "CompDays": ["2024-09-29", "2024-10-12"]}
    ]
  }
}"#;
