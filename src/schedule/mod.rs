//! Time-window queries over todos
//!
//! - `materialize`: recurrence expansion into occurrences
//! - `events`: manual calendar events
//! - `agenda`: upcoming events, todo list views and per-day counts

mod agenda;
mod events;
mod materialize;

pub use agenda::{
    DEFAULT_AGENDA_HOURS, ListWindow, VisibleItem, collect_visible, day_counts,
    list_upcoming_events,
};
pub use events::{
    DEFAULT_EVENT_TITLE, EventSource, ScheduleEvent, generate_event_id, normalize_event,
    normalize_events,
};
pub use materialize::{
    MAX_ADVANCE_STEPS, MAX_OCCURRENCES_PER_TODO, Materializer, Occurrence, is_materializable,
    occurrence_id,
};
