//! Schedule handlers: materialize, per-day counts, agenda and manual events

use crate::Planner;
use crate::date;
use crate::formatting;
use crate::schedule::{DEFAULT_AGENDA_HOURS, ScheduleEvent};
use crate::validation;
use anyhow::{Result, bail};

impl Planner {
    /// Expand todos into occurrences inside `[start, end]`
    ///
    /// A bound that cannot be read as a date or date-time gives an empty
    /// listing, the same as an inverted window.
    pub async fn handle_materialize(&self, start: String, end: String) -> Result<String> {
        let occurrences = self.materialize_iso(&start, &end);
        Ok(formatting::format_occurrences(&occurrences, self.tz()))
    }

    /// Occurrence counts per day from `start` to `end` (inclusive dates),
    /// annotated with holidays and make-up workdays
    pub async fn handle_days(&self, start: String, end: String) -> Result<String> {
        let tz = self.tz();
        let start = validation::parse_date(&start)?;
        let end = validation::parse_date(&end)?;
        if end < start {
            bail!("End date {} is before start date {}", end, start);
        }

        let counts = self.day_counts(date::start_of_day(start, tz), date::end_of_day(end, tz));
        let first = start.format("%Y-%m-%d").to_string();
        let last = end.format("%Y-%m-%d").to_string();
        let mut holidays = self.holidays_between(start, end).await;
        holidays.retain(|day, _| *day >= first && *day <= last);

        Ok(formatting::format_day_counts(&counts, &holidays))
    }

    /// Upcoming todo occurrences and manual events
    ///
    /// # Arguments
    /// * `hours` - Look-ahead from now (default 72, minimum 1)
    pub async fn handle_agenda(&self, hours: Option<i64>) -> Result<String> {
        let events = self.upcoming_events(date::now_utc(), hours.unwrap_or(DEFAULT_AGENDA_HOURS));
        Ok(formatting::format_events(&events, self.tz()))
    }

    /// Add a manual calendar event; `end` defaults to `start`
    pub async fn handle_event_add(
        &self,
        title: String,
        start: String,
        end: Option<String>,
    ) -> Result<String> {
        let tz = self.tz();
        let start = validation::parse_datetime(&start, tz)?;
        let end = end
            .as_deref()
            .map(|value| validation::parse_datetime(value, tz))
            .transpose()?;
        if end.is_some_and(|end| end < start) {
            bail!("Event end must not be before its start");
        }

        let event = self.add_event(ScheduleEvent::manual(title, start, end))?;
        Ok(format!(
            "Event created with ID: {} ({})",
            event.id,
            date::format_date_time(event.start, tz)
        ))
    }
}
