//! Lenient decoding of persisted todos
//!
//! Stored todo blobs are never versioned. Instead every read runs each record
//! through [`normalize_todo`], which fills defaults for missing or malformed
//! fields the same way for old and new data. A record that is not an object
//! still yields a todo (with a fresh id), so nothing in the blob is silently
//! lost.

use super::item::{Priority, RepeatRule, TodoItem, TodoStatus, generate_todo_id, normalize_tags};
use crate::date::parse_instant;
use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde_json::Value;

/// Render a scalar JSON value as text; objects, arrays and null become `None`
pub(crate) fn value_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Read a timestamp field: strings in any form [`parse_instant`] accepts, or epoch milliseconds
pub(crate) fn value_instant(value: Option<&Value>, tz: Tz) -> Option<DateTime<Utc>> {
    match value? {
        Value::String(s) => parse_instant(s, tz),
        Value::Number(n) => n
            .as_i64()
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        _ => None,
    }
}

fn value_enum<T: std::str::FromStr + Default>(value: Option<&Value>) -> T {
    value
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .unwrap_or_default()
}

fn value_tags(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => {
            let texts: Vec<String> = items.iter().filter_map(|v| value_text(Some(v))).collect();
            normalize_tags(texts.iter().map(String::as_str))
        }
        Some(Value::String(s)) => normalize_tags(s.split(',')),
        _ => Vec::new(),
    }
}

/// Normalize one persisted todo record
///
/// # Arguments
/// * `raw` - The stored JSON value
/// * `now` - Instant used for missing timestamps
/// * `tz` - Timezone for timestamps stored without an offset
///
/// # Returns
/// A fully populated todo: unknown repeat/status/priority fall back to
/// none/todo/medium, an unreadable due time becomes `now`, and the legacy
/// `dueAt` key is honoured when `dueAtISO` is absent.
pub fn normalize_todo(raw: &Value, now: DateTime<Utc>, tz: Tz) -> TodoItem {
    let empty = serde_json::Map::new();
    let fields = raw.as_object().unwrap_or(&empty);

    let id = value_text(fields.get("id"))
        .filter(|id| !id.trim().is_empty())
        .unwrap_or_else(generate_todo_id);
    let due_at = value_instant(fields.get("dueAtISO"), tz)
        .or_else(|| value_instant(fields.get("dueAt"), tz))
        .unwrap_or(now);

    TodoItem {
        id,
        title: value_text(fields.get("title")).unwrap_or_default(),
        note: value_text(fields.get("note")).unwrap_or_default(),
        due_at,
        repeat: value_enum::<RepeatRule>(fields.get("repeat")),
        status: value_enum::<TodoStatus>(fields.get("status")),
        priority: value_enum::<Priority>(fields.get("priority")),
        tags: value_tags(fields.get("tags")),
        created_at: value_instant(fields.get("createdAtISO"), tz).unwrap_or(now),
        updated_at: value_instant(fields.get("updatedAtISO"), tz).unwrap_or(now),
    }
    .normalized()
}

/// Normalize a whole todos blob; anything other than an array yields no todos
pub fn normalize_todos(raw: &Value, now: DateTime<Utc>, tz: Tz) -> Vec<TodoItem> {
    match raw {
        Value::Array(items) => items.iter().map(|item| normalize_todo(item, now, tz)).collect(),
        _ => Vec::new(),
    }
}
