//! Formatting helper functions for CLI output
//!
//! Times are shown as wall-clock times in the settings timezone.

use crate::clock::ClockState;
use crate::config::Settings;
use crate::date::{format_date_time, format_time};
use crate::editor::EditorDoc;
use crate::holiday::{HolidayKind, HolidayMap, SyncReport};
use crate::schedule::{EventSource, Occurrence, ScheduleEvent, VisibleItem};
use crate::todo::{RepeatRule, TodoItem};
use chrono_tz::Tz;
use std::collections::BTreeMap;
use std::fmt::Write;

fn tags_suffix(tags: &[String]) -> String {
    if tags.is_empty() {
        String::new()
    } else {
        format!(" #{}", tags.join(" #"))
    }
}

fn repeat_suffix(repeat: RepeatRule) -> String {
    if repeat.is_repeating() {
        format!(", repeat: {}", repeat)
    } else {
        String::new()
    }
}

/// One-line summary of a todo
pub fn format_todo_line(todo: &TodoItem, tz: Tz) -> String {
    format!(
        "- [{}] {} (status: {}, priority: {}, due: {}{}){}",
        todo.id,
        todo.title,
        todo.status,
        todo.priority,
        format_date_time(todo.due_at, tz),
        repeat_suffix(todo.repeat),
        tags_suffix(&todo.tags)
    )
}

/// Format todos into a display string
///
/// # Arguments
/// * `todos` - Todos to list
/// * `tz` - Display timezone
/// * `exclude_notes` - Whether to leave notes out
pub fn format_todos(todos: &[TodoItem], tz: Tz, exclude_notes: bool) -> String {
    if todos.is_empty() {
        return "No todos found".to_string();
    }

    let mut result = format!("Found {} todo(s):\n\n", todos.len());
    for todo in todos {
        result.push_str(&format_todo_line(todo, tz));
        result.push('\n');
        if !exclude_notes && !todo.note.is_empty() {
            let _ = writeln!(result, "  Note: {}", todo.note);
        }
    }
    result
}

/// Rows of a list view, one per occurrence
pub fn format_visible(items: &[VisibleItem], tz: Tz) -> String {
    if items.is_empty() {
        return "No todos found".to_string();
    }

    let mut result = format!("Found {} row(s):\n\n", items.len());
    for item in items {
        let _ = writeln!(
            result,
            "- {} [{}] {} (status: {}, priority: {}{}){}",
            format_date_time(item.occurrence, tz),
            item.todo.id,
            item.todo.title,
            item.todo.status,
            item.todo.priority,
            repeat_suffix(item.todo.repeat),
            tags_suffix(&item.todo.tags)
        );
    }
    result
}

pub fn format_occurrences(occurrences: &[Occurrence], tz: Tz) -> String {
    if occurrences.is_empty() {
        return "No occurrences in range".to_string();
    }

    let mut result = format!("Found {} occurrence(s):\n\n", occurrences.len());
    for occ in occurrences {
        let _ = writeln!(
            result,
            "- {} {} [{}] (status: {}{})",
            format_date_time(occ.start, tz),
            occ.title,
            occ.occurrence_id,
            occ.status,
            repeat_suffix(occ.repeat)
        );
    }
    result
}

pub fn format_events(events: &[ScheduleEvent], tz: Tz) -> String {
    if events.is_empty() {
        return "No upcoming events".to_string();
    }

    let mut result = format!("Found {} event(s):\n\n", events.len());
    for event in events {
        let span = if event.end > event.start {
            format!(
                "{} - {}",
                format_date_time(event.start, tz),
                format_time(event.end, tz)
            )
        } else {
            format_date_time(event.start, tz)
        };
        let source = match event.source {
            EventSource::todo => "todo",
            EventSource::manual => "event",
        };
        let _ = writeln!(result, "- {} {} ({}: {})", span, event.title, source, event.id);
    }
    result
}

pub fn format_day_counts(counts: &BTreeMap<String, usize>, holidays: &HolidayMap) -> String {
    if counts.is_empty() && holidays.is_empty() {
        return "No occurrences in range".to_string();
    }

    let mut days: Vec<&String> = counts.keys().chain(holidays.keys()).collect();
    days.sort();
    days.dedup();

    let mut result = String::new();
    for day in days {
        let count = counts.get(day).copied().unwrap_or(0);
        let _ = write!(result, "{}  {} item(s)", day, count);
        if let Some(entry) = holidays.get(day) {
            let _ = write!(result, "  [{}: {}]", kind_label(entry.kind), entry.name);
        }
        result.push('\n');
    }
    result
}

fn kind_label(kind: HolidayKind) -> &'static str {
    match kind {
        HolidayKind::holiday => "off",
        HolidayKind::workday => "work",
    }
}

pub fn format_holidays(year: i32, holidays: &HolidayMap) -> String {
    if holidays.is_empty() {
        return format!("No holiday data for {}", year);
    }

    let mut result = format!("{} holiday entr(ies) for {}:\n\n", holidays.len(), year);
    for entry in holidays.values() {
        let _ = writeln!(
            result,
            "- {} [{}] {} (source: {})",
            entry.date,
            kind_label(entry.kind),
            entry.name,
            entry.source
        );
    }
    result
}

pub fn format_sync_report(report: &SyncReport) -> String {
    format!(
        "Synced {} holiday entr(ies) for {} from {} at {}",
        report.count, report.year, report.source, report.updated_at
    )
}

pub fn format_clock(clock: &ClockState, tz: Tz) -> String {
    let state = if clock.running {
        "running"
    } else if clock.remaining_ms > 0 {
        "paused"
    } else {
        "idle"
    };
    let mut result = format!("Countdown {} ({})", clock.format_remaining(), state);
    if let Some(target) = clock.target {
        let _ = write!(result, ", target {}", format_date_time(target, tz));
    }
    if clock.muted {
        result.push_str(", muted");
    }
    result
}

pub fn format_docs(docs: &[EditorDoc], tz: Tz) -> String {
    let mut result = format!("{} document(s):\n\n", docs.len());
    for doc in docs {
        let _ = writeln!(
            result,
            "- [{}] {} (updated: {}, {} char(s))",
            doc.id,
            doc.title,
            format_date_time(doc.updated_at, tz),
            doc.content.chars().count()
        );
    }
    result
}

pub fn format_settings(settings: &Settings) -> String {
    format!(
        "language: {}\ntimezone: {}\ntheme: {}",
        settings.language, settings.timezone, settings.theme
    )
}
