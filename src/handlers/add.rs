//! Add handler

use crate::Planner;
use crate::date;
use crate::todo::{TodoItem, parse_tag_list};
use crate::validation;
use anyhow::Result;

impl Planner {
    /// Create a todo
    ///
    /// # Arguments
    /// * `title` - Title; blank becomes "Untitled task"
    /// * `due` - Due date/time; defaults to one hour from now
    /// * `repeat` - none, hourly, daily, weekly or monthly
    /// * `priority` - low, medium or high
    /// * `note` - Free-form note
    /// * `tags` - Comma separated tags (at most 8 are kept)
    pub async fn handle_add(
        &self,
        title: String,
        due: Option<String>,
        repeat: Option<String>,
        priority: Option<String>,
        note: Option<String>,
        tags: Option<String>,
    ) -> Result<String> {
        let tz = self.tz();
        let now = date::now_utc();

        let due_at = match due {
            Some(ref value) => validation::parse_datetime(value, tz)?,
            None => date::add_hours(now, 1),
        };

        let mut todo = TodoItem::new(title, due_at, now);
        if let Some(ref value) = repeat {
            todo.repeat = validation::parse_repeat(value)?;
        }
        if let Some(ref value) = priority {
            todo.priority = validation::parse_priority(value)?;
        }
        if let Some(note) = note {
            todo.note = note;
        }
        if let Some(ref value) = tags {
            todo.tags = parse_tag_list(value);
        }

        let stored = self.upsert_todo(todo)?;
        tracing::info!(id = %stored.id, "todo created");
        Ok(format!(
            "Todo created with ID: {} (due: {})",
            stored.id,
            date::format_date_time(stored.due_at, tz)
        ))
    }
}
