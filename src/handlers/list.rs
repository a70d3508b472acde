//! List handler

use crate::Planner;
use crate::date;
use crate::formatting;
use crate::todo::TodoFilter;
use crate::validation;
use anyhow::Result;

impl Planner {
    /// List todos, either as stored or through a time window
    ///
    /// Without `window` every matching todo is listed once, ascending by due.
    /// With `window` (today, 24h, week, month, done, expired, all) the rows
    /// are occurrences, so a repeating todo may appear several times; the
    /// other filters still apply to the todo behind each row.
    #[allow(clippy::too_many_arguments)]
    pub async fn handle_list(
        &self,
        status: Option<String>,
        window: Option<String>,
        search: Option<String>,
        from: Option<String>,
        to: Option<String>,
        include_archived: bool,
        exclude_notes: bool,
    ) -> Result<String> {
        let tz = self.tz();

        let mut filter = TodoFilter::new().include_archived(include_archived);
        if let Some(ref value) = status {
            filter = filter.statuses(validation::parse_status_list(value)?);
        }
        if let Some(keyword) = search {
            filter = filter.search(keyword);
        }
        let due_from = from
            .as_deref()
            .map(|value| validation::parse_datetime(value, tz))
            .transpose()?;
        let due_to = to
            .as_deref()
            .map(|value| validation::parse_datetime(value, tz))
            .transpose()?;
        filter = filter.due_between(due_from, due_to);

        match window {
            Some(ref value) => {
                let window = validation::parse_window(value)?;
                let mut rows = self.visible(window, date::now_utc());
                rows.retain(|row| filter.matches(&row.todo));
                Ok(formatting::format_visible(&rows, tz))
            }
            None => {
                let todos = self.list_todos(&filter);
                Ok(formatting::format_todos(&todos, tz, exclude_notes))
            }
        }
    }
}
