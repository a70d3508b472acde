//! Update handler

use crate::Planner;
use crate::todo::parse_tag_list;
use crate::validation;
use anyhow::{Result, bail};

impl Planner {
    /// Edit fields of an existing todo; `None` leaves a field unchanged
    ///
    /// An empty `note` or `tags` value clears it.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_update(
        &self,
        id: String,
        title: Option<String>,
        due: Option<String>,
        repeat: Option<String>,
        status: Option<String>,
        priority: Option<String>,
        note: Option<String>,
        tags: Option<String>,
    ) -> Result<String> {
        let id = validation::normalize_id(&id)?;
        let tz = self.tz();

        let Some(mut todo) = self.find_todo(&id) else {
            bail!("Todo '{}' not found", id);
        };

        if let Some(title) = title {
            todo.title = title;
        }
        if let Some(ref value) = due {
            todo.due_at = validation::parse_datetime(value, tz)?;
        }
        if let Some(ref value) = repeat {
            todo.repeat = validation::parse_repeat(value)?;
        }
        if let Some(ref value) = status {
            todo.status = validation::parse_status(value)?;
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
        Ok(format!("Todo {} updated (status: {})", stored.id, stored.status))
    }
}
