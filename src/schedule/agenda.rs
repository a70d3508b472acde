//! Agenda views built on top of materialization
//!
//! - upcoming events: todo occurrences and manual events in a rolling window
//! - list windows: the todo list's today / 24h / week / month / done / expired / all views
//! - day counts: occurrences per calendar day, for calendar badges

use super::events::{EventSource, ScheduleEvent, todo_event_id};
use super::materialize::Materializer;
use crate::date::{
    add_hours, day_key, end_of_month, end_of_today, end_of_week, start_of_month, start_of_today,
    start_of_week,
};
use crate::todo::{TodoItem, TodoStatus};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// Default look-ahead of the upcoming-events agenda
pub const DEFAULT_AGENDA_HOURS: i64 = 72;

/// Merge todo occurrences and manual events starting in `[now, now + hours]`
///
/// # Arguments
/// * `materializer` - Expands repeating todos
/// * `todos` - Todo snapshot (archived todos are skipped by the materializer)
/// * `manual` - Stored manual events
/// * `now` - Window start
/// * `hours` - Look-ahead; values below 1 are treated as 1
///
/// # Returns
/// Events sorted by start. Todo occurrences whose todo is done are left out,
/// and each todo event starts and ends at its occurrence instant.
pub fn list_upcoming_events(
    materializer: &Materializer,
    todos: &[TodoItem],
    manual: &[ScheduleEvent],
    now: DateTime<Utc>,
    hours: i64,
) -> Vec<ScheduleEvent> {
    let end = add_hours(now, hours.max(1));

    let todo_events = materializer
        .materialize(todos, now, end)
        .into_iter()
        .filter(|occ| !matches!(occ.status, TodoStatus::done | TodoStatus::archived))
        .map(|occ| ScheduleEvent {
            id: todo_event_id(&occ.occurrence_id),
            source: EventSource::todo,
            title: occ.title,
            start: occ.start,
            end: occ.start,
            related_todo_id: occ.todo_id,
            priority: Some(occ.priority),
            tags: occ.tags,
        });

    let manual_events = manual
        .iter()
        .filter(|event| event.start >= now && event.start <= end)
        .cloned();

    let mut events: Vec<ScheduleEvent> = todo_events.chain(manual_events).collect();
    events.sort_by_key(|event| event.start);
    events
}

/// Todo list views
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListWindow {
    /// Occurrences between local midnight and the end of today
    today,
    /// Occurrences in the next 24 hours
    next24h,
    /// Occurrences in the current Monday-to-Sunday week
    week,
    /// Occurrences in the current calendar month
    month,
    /// Completed todos at their due time
    done,
    /// Unfinished todos already past due
    expired,
    /// Every non-archived todo at its due time
    all,
}

impl FromStr for ListWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "today" => Ok(ListWindow::today),
            "24h" => Ok(ListWindow::next24h),
            "week" => Ok(ListWindow::week),
            "month" => Ok(ListWindow::month),
            "done" => Ok(ListWindow::done),
            "expired" => Ok(ListWindow::expired),
            "all" => Ok(ListWindow::all),
            _ => Err(format!(
                "Invalid window '{}'. Valid options are: today, 24h, week, month, done, expired, all",
                s
            )),
        }
    }
}

impl fmt::Display for ListWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListWindow::next24h => write!(f, "24h"),
            other => write!(f, "{:?}", other),
        }
    }
}

impl ListWindow {
    /// Time bounds of a windowed view, `None` for the status-based views
    pub fn bounds(self, now: DateTime<Utc>, materializer: &Materializer) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let tz = materializer.timezone();
        match self {
            ListWindow::today => Some((start_of_today(now, tz), end_of_today(now, tz))),
            ListWindow::next24h => Some((now, add_hours(now, 24))),
            ListWindow::week => Some((start_of_week(now, tz), end_of_week(now, tz))),
            ListWindow::month => Some((start_of_month(now, tz), end_of_month(now, tz))),
            ListWindow::done | ListWindow::expired | ListWindow::all => None,
        }
    }
}

/// A todo as shown in a list view, pinned to one occurrence instant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleItem {
    pub todo: TodoItem,
    pub occurrence: DateTime<Utc>,
}

/// Collect the rows of a todo list view
///
/// # Arguments
/// * `materializer` - Expands repeating todos for windowed views
/// * `todos` - Non-archived todos (as returned by [`crate::todo::TodoData::active`])
/// * `window` - The view
/// * `now` - Reference instant for windows and for `expired`
///
/// # Returns
/// Rows sorted by occurrence instant. Windowed views list one row per
/// occurrence, so a daily todo shows up seven times in `week`.
pub fn collect_visible(
    materializer: &Materializer,
    todos: &[TodoItem],
    window: ListWindow,
    now: DateTime<Utc>,
) -> Vec<VisibleItem> {
    let at_due = |todo: &TodoItem| VisibleItem {
        todo: todo.clone(),
        occurrence: todo.due_at,
    };

    let mut items: Vec<VisibleItem> = match window.bounds(now, materializer) {
        Some((start, end)) => {
            let by_id: HashMap<&str, &TodoItem> =
                todos.iter().map(|todo| (todo.id.as_str(), todo)).collect();
            materializer
                .materialize(todos, start, end)
                .into_iter()
                .filter_map(|occ| {
                    let todo = by_id.get(occ.todo_id.as_str())?;
                    (todo.status != TodoStatus::archived).then(|| VisibleItem {
                        todo: (*todo).clone(),
                        occurrence: occ.start,
                    })
                })
                .collect()
        }
        None => match window {
            ListWindow::done => todos
                .iter()
                .filter(|todo| todo.status == TodoStatus::done)
                .map(at_due)
                .collect(),
            ListWindow::expired => todos
                .iter()
                .filter(|todo| todo.status != TodoStatus::done && todo.due_at < now)
                .map(at_due)
                .collect(),
            _ => todos
                .iter()
                .filter(|todo| todo.status != TodoStatus::archived)
                .map(at_due)
                .collect(),
        },
    };

    items.sort_by_key(|item| item.occurrence);
    items
}

/// Number of occurrences per day key inside `[start, end]`
pub fn day_counts(
    materializer: &Materializer,
    todos: &[TodoItem],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> BTreeMap<String, usize> {
    let tz = materializer.timezone();
    let mut counts = BTreeMap::new();
    for occ in materializer.materialize(todos, start, end) {
        *counts.entry(day_key(occ.start, tz)).or_insert(0) += 1;
    }
    counts
}
