//! Validation helper functions for CLI input
//!
//! Every parser returns an error naming the accepted values or format, so the
//! message can be shown to the user as is.

use crate::config::{Language, ThemeMode, parse_timezone};
use crate::date;
use crate::schedule::ListWindow;
use crate::todo::{Priority, RepeatRule, TodoStatus};
use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Parse a repeat rule (none, hourly, daily, weekly, monthly)
pub fn parse_repeat(value: &str) -> Result<RepeatRule> {
    value.parse::<RepeatRule>().map_err(anyhow::Error::msg)
}

/// Parse a todo status (todo, doing, done, archived)
pub fn parse_status(value: &str) -> Result<TodoStatus> {
    value.parse::<TodoStatus>().map_err(anyhow::Error::msg)
}

/// Parse a comma separated status list, e.g. `"todo,doing"`
pub fn parse_status_list(value: &str) -> Result<Vec<TodoStatus>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(parse_status)
        .collect()
}

pub fn parse_priority(value: &str) -> Result<Priority> {
    value.parse::<Priority>().map_err(anyhow::Error::msg)
}

/// Parse a list view (today, 24h, week, month, done, expired, all)
pub fn parse_window(value: &str) -> Result<ListWindow> {
    value.parse::<ListWindow>().map_err(anyhow::Error::msg)
}

pub fn parse_language(value: &str) -> Result<Language> {
    value.parse::<Language>().map_err(anyhow::Error::msg)
}

pub fn parse_theme(value: &str) -> Result<ThemeMode> {
    value.parse::<ThemeMode>().map_err(anyhow::Error::msg)
}

pub fn parse_tz(value: &str) -> Result<Tz> {
    parse_timezone(value).map_err(anyhow::Error::msg)
}

/// Parse a date or date-time
///
/// # Arguments
/// * `value` - RFC 3339 (`2025-03-15T09:00:00Z`), local date-time
///   (`2025-03-15 09:00`) or date (`2025-03-15`, meaning local midnight)
/// * `tz` - Zone for values without an offset
pub fn parse_datetime(value: &str, tz: Tz) -> Result<DateTime<Utc>> {
    date::parse_instant(value, tz).ok_or_else(|| {
        anyhow!(
            "Invalid date/time '{}'. Use YYYY-MM-DD, 'YYYY-MM-DD HH:MM' or RFC 3339 (e.g., '2025-03-15T09:00:00+08:00')",
            value
        )
    })
}

/// Parse a calendar date in YYYY-MM-DD format
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        anyhow!(
            "Invalid date format '{}'. Use YYYY-MM-DD (e.g., '2025-03-15')",
            value
        )
    })
}

/// Parse a four-digit year
pub fn parse_year(value: &str) -> Result<i32> {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .filter(|year| (1900..=2999).contains(year))
        .ok_or_else(|| anyhow!("Invalid year '{}'. Use a four-digit year (e.g., '2025')", value))
}

/// Trim an id and reject blank ones
pub fn normalize_id(id: &str) -> Result<String> {
    let id = id.trim();
    if id.is_empty() {
        return Err(anyhow!("ID must not be empty"));
    }
    Ok(id.to_string())
}
