use crate::todo::{Priority, value_instant, value_text};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Title given to manual events saved without one
pub const DEFAULT_EVENT_TITLE: &str = "Untitled event";

/// Where a schedule event comes from
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventSource {
    /// Created directly on the calendar
    #[default]
    manual,
    /// Derived from a todo occurrence
    todo,
}

/// A calendar/agenda entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleEvent {
    pub id: String,
    pub source: EventSource,
    pub title: String,
    #[serde(rename = "startISO")]
    pub start: DateTime<Utc>,
    #[serde(rename = "endISO")]
    pub end: DateTime<Utc>,
    /// Todo this event belongs to; empty for free-standing events
    #[serde(default)]
    pub related_todo_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl ScheduleEvent {
    /// Create a manual event with a fresh id
    pub fn manual(title: impl Into<String>, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Self {
        let title = title.into().trim().to_string();
        Self {
            id: generate_event_id(),
            source: EventSource::manual,
            title: if title.is_empty() {
                DEFAULT_EVENT_TITLE.to_string()
            } else {
                title
            },
            start,
            end: end.unwrap_or(start).max(start),
            related_todo_id: String::new(),
            priority: None,
            tags: Vec::new(),
        }
    }
}

pub fn generate_event_id() -> String {
    format!("event_{}", uuid::Uuid::new_v4())
}

/// Normalize one stored manual event
///
/// # Returns
/// `None` when the record has no readable start time; otherwise an event with
/// `source = manual`, a default title when blank and `end` defaulting to `start`.
pub fn normalize_event(raw: &Value, tz: Tz) -> Option<ScheduleEvent> {
    let fields = raw.as_object()?;
    let start = value_instant(fields.get("startISO"), tz)?;
    let end = value_instant(fields.get("endISO"), tz).unwrap_or(start);
    let title = value_text(fields.get("title"))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_EVENT_TITLE.to_string());

    Some(ScheduleEvent {
        id: value_text(fields.get("id"))
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(generate_event_id),
        source: EventSource::manual,
        title,
        start,
        end,
        related_todo_id: value_text(fields.get("relatedTodoId")).unwrap_or_default(),
        priority: None,
        tags: Vec::new(),
    })
}

/// Normalize a stored events blob, dropping unusable records
pub fn normalize_events(raw: &Value, tz: Tz) -> Vec<ScheduleEvent> {
    match raw {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| normalize_event(item, tz))
            .collect(),
        _ => Vec::new(),
    }
}

/// Todo ids get their own prefix so they never collide with event ids
pub(crate) fn todo_event_id(occurrence_id: &str) -> String {
    format!("todo__{}", occurrence_id)
}
