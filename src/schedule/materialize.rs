//! Recurrence materialization
//!
//! Expands todos into concrete occurrences inside a closed window
//! `[start, end]`. One-shot todos produce at most one occurrence; repeating
//! todos are walked forward from their anchor (`due_at`) one repeat step at a
//! time. Both walks are bounded so a far-away window or a dense rule can never
//! run away:
//! - at most [`MAX_ADVANCE_STEPS`] steps to reach the window start
//! - at most [`MAX_OCCURRENCES_PER_TODO`] occurrences emitted per todo
//!
//! Materialization is a pure read of the todos it is given. It never fails:
//! a degenerate window yields an empty list.

use crate::date::{DEFAULT_TIMEZONE, parse_instant};
use crate::todo::{Priority, RepeatRule, TodoItem, TodoStatus};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

/// Maximum repeat steps taken to bring an anchor up to the window start
pub const MAX_ADVANCE_STEPS: usize = 2400;

/// Maximum occurrences emitted for a single todo in one window
pub const MAX_OCCURRENCES_PER_TODO: usize = 500;

/// One time-resolved instance of a todo
///
/// Occurrences are derived on every query and never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    /// `"<todo id>__<epoch millis>"`, stable for a given (todo, instant) pair
    pub occurrence_id: String,
    pub todo_id: String,
    pub title: String,
    pub note: String,
    pub priority: Priority,
    pub status: TodoStatus,
    pub repeat: RepeatRule,
    /// Resolved instant of this occurrence
    #[serde(rename = "startISO")]
    pub start: DateTime<Utc>,
    /// The todo's anchor due time
    #[serde(rename = "dueAtISO")]
    pub due_at: DateTime<Utc>,
    pub tags: Vec<String>,
}

impl Occurrence {
    fn of(todo: &TodoItem, start: DateTime<Utc>) -> Self {
        Self {
            occurrence_id: occurrence_id(&todo.id, start),
            todo_id: todo.id.clone(),
            title: todo.title.clone(),
            note: todo.note.clone(),
            priority: todo.priority,
            status: todo.status,
            repeat: todo.repeat,
            start,
            due_at: todo.due_at,
            tags: todo.tags.clone(),
        }
    }
}

/// Build the occurrence key for a todo at an instant
pub fn occurrence_id(todo_id: &str, instant: DateTime<Utc>) -> String {
    format!("{}__{}", todo_id, instant.timestamp_millis())
}

/// Whether a todo can produce occurrences at all
///
/// Archived todos never do, and neither does a completed one-shot todo.
pub fn is_materializable(todo: &TodoItem) -> bool {
    match todo.status {
        TodoStatus::archived => false,
        TodoStatus::done => todo.repeat.is_repeating(),
        TodoStatus::todo | TodoStatus::doing => true,
    }
}

/// Expands todos into occurrences
///
/// The timezone decides where calendar days and months begin for the daily,
/// weekly and monthly steps.
#[derive(Debug, Clone, Copy)]
pub struct Materializer {
    tz: Tz,
}

impl Default for Materializer {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEZONE)
    }
}

impl Materializer {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Materialize occurrences inside `[start, end]`
    ///
    /// # Arguments
    /// * `todos` - Todos to expand, in the caller's order
    /// * `start` - Window start, inclusive
    /// * `end` - Window end, inclusive
    ///
    /// # Returns
    /// Occurrences sorted ascending by instant. Occurrences at the same instant
    /// are ordered by todo id, then by their todo's position in `todos`.
    /// Empty when `start > end`.
    pub fn materialize(
        &self,
        todos: &[TodoItem],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Occurrence> {
        if start > end {
            return Vec::new();
        }

        let mut occurrences = Vec::new();
        for todo in todos.iter().filter(|todo| is_materializable(todo)) {
            self.expand(todo, start, end, &mut occurrences);
        }

        // sort_by is stable, so equal (instant, id) pairs keep input order
        occurrences.sort_by(|a, b| {
            a.start
                .cmp(&b.start)
                .then_with(|| a.todo_id.cmp(&b.todo_id))
        });
        tracing::debug!(
            todos = todos.len(),
            occurrences = occurrences.len(),
            %start,
            %end,
            "materialized window"
        );
        occurrences
    }

    /// Materialize with textual window bounds
    ///
    /// Bounds accept any form [`parse_instant`] understands. An unparsable
    /// bound yields an empty list rather than an error.
    pub fn materialize_iso(&self, todos: &[TodoItem], start: &str, end: &str) -> Vec<Occurrence> {
        match (parse_instant(start, self.tz), parse_instant(end, self.tz)) {
            (Some(start), Some(end)) => self.materialize(todos, start, end),
            _ => Vec::new(),
        }
    }

    fn expand(
        &self,
        todo: &TodoItem,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        out: &mut Vec<Occurrence>,
    ) {
        if !todo.repeat.is_repeating() {
            if todo.due_at >= start && todo.due_at <= end {
                out.push(Occurrence::of(todo, todo.due_at));
            }
            return;
        }

        let mut current = todo.due_at;
        let mut steps = 0;
        while current < start && steps < MAX_ADVANCE_STEPS {
            match todo.repeat.advance(current, self.tz) {
                Some(next) => current = next,
                None => return,
            }
            steps += 1;
        }
        // Anchor too far behind the window to reach within the step budget
        if current < start {
            return;
        }

        let mut emitted = 0;
        while current <= end && emitted < MAX_OCCURRENCES_PER_TODO {
            out.push(Occurrence::of(todo, current));
            emitted += 1;
            match todo.repeat.advance(current, self.tz) {
                Some(next) => current = next,
                None => break,
            }
        }
    }
}
