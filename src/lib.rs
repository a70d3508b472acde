//! BaoXiangGao Tools planner library
//!
//! This library provides the planner core behind the `bxg-tools` command: a
//! todo store with recurring todos, time-window materialization of those todos
//! into concrete occurrences, an agenda that merges them with manual calendar
//! events, day-keyed holiday annotations, a countdown clock, and markdown
//! editor documents.
//!
//! # Architecture
//!
//! The library follows a 3-layer architecture:
//! - **Command Layer**: `Planner` plus `handlers` - validates CLI input and formats output
//! - **Domain Layer**: `todo`, `schedule`, `holiday`, `clock`, `editor` modules
//! - **Persistence Layer**: `storage` module - keyed JSON blobs in a data directory
//!
//! # Example
//!
//! ```no_run
//! use bxg_tools::Planner;
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let planner = Planner::new("./bxg-data")?;
//!     let start = "2024-05-01T00:00:00Z";
//!     let end = "2024-05-31T23:59:59Z";
//!     for occurrence in planner.materialize_iso(start, end) {
//!         println!("{} {}", occurrence.start, occurrence.title);
//!     }
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod date;
pub mod editor;
pub mod fallback;
pub mod formatting;
pub mod handlers;
pub mod holiday;
pub mod schedule;
pub mod storage;
pub mod todo;
pub mod validation;

use anyhow::{Result, bail};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

// Re-export commonly used types
pub use clock::ClockState;
pub use config::{AppConfig, HolidayConfig, Language, Settings, ThemeMode};
pub use editor::{EditorDoc, EditorDocs};
pub use holiday::{HolidayEntry, HolidayKind, HolidayMap, SyncReport};
pub use schedule::{ListWindow, Materializer, Occurrence, ScheduleEvent, VisibleItem};
pub use storage::{StateChange, Storage, Subscription};
pub use todo::{Priority, RepeatRule, TodoData, TodoFilter, TodoItem, TodoStatus};

/// Write the default value of every storage key that has never been written
///
/// # Returns
/// Number of keys initialized
pub fn initialize_defaults(storage: &Storage) -> Result<usize> {
    let empty: Vec<Value> = Vec::new();
    let written = [
        storage.set_default(storage::keys::SETTINGS, &Settings::default())?,
        storage.set_default(storage::keys::TODOS, &empty)?,
        storage.set_default(storage::keys::EVENTS, &empty)?,
        storage.set_default(storage::keys::EDITOR_DOCS, &empty)?,
        storage.set_default(storage::keys::CLOCK, &ClockState::default())?,
        storage.set_default(storage::keys::HOLIDAY_CACHE, &holiday::HolidayCache::default())?,
    ];
    Ok(written.into_iter().filter(|written| *written).count())
}

/// Planner facade over the persisted state
///
/// Holds the todo store in memory and writes it back to storage after every
/// change. Settings are loaded once and passed explicitly to the views that
/// depend on the timezone or language.
pub struct Planner {
    pub(crate) data: Mutex<TodoData>,
    pub(crate) storage: Storage,
    pub(crate) settings: Mutex<Settings>,
    pub(crate) holiday_config: HolidayConfig,
}

impl Planner {
    /// Open (or initialize) a data directory
    ///
    /// # Arguments
    /// * `data_dir` - Directory holding the JSON blobs; created on first write
    ///
    /// # Example
    /// ```no_run
    /// # use bxg_tools::Planner;
    /// # use anyhow::Result;
    /// # fn main() -> Result<()> {
    /// let planner = Planner::new("./bxg-data")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::with_config(data_dir, &AppConfig::default())
    }

    /// Open a data directory with a loaded `--config` file applied
    pub fn with_config(data_dir: impl AsRef<Path>, config: &AppConfig) -> Result<Self> {
        let storage = Storage::new(data_dir);
        let initialized = initialize_defaults(&storage)?;
        if initialized > 0 {
            tracing::info!(dir = %storage.dir().display(), keys = initialized, "initialized storage");
        }

        let mut settings = Settings::load(&storage);
        config.apply_to(&mut settings);
        let tz = settings.tz();

        let raw = storage.get_value(storage::keys::TODOS).unwrap_or(Value::Null);
        let todos = todo::normalize_todos(&raw, date::now_utc(), tz);
        tracing::debug!(count = todos.len(), "todos loaded");

        Ok(Self {
            data: Mutex::new(TodoData::from_todos(todos)),
            storage,
            settings: Mutex::new(settings),
            holiday_config: config.holiday.clone(),
        })
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub fn settings(&self) -> Settings {
        self.settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn tz(&self) -> Tz {
        self.settings().tz()
    }

    pub fn language(&self) -> Language {
        self.settings().language
    }

    pub fn materializer(&self) -> Materializer {
        Materializer::new(self.tz())
    }

    /// Change and persist preferences; `None` leaves a field as is
    pub fn update_settings(
        &self,
        language: Option<Language>,
        timezone: Option<Tz>,
        theme: Option<ThemeMode>,
    ) -> Result<Settings> {
        let mut settings = self.settings.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(language) = language {
            settings.language = language;
        }
        if let Some(tz) = timezone {
            settings.timezone = tz.name().to_string();
        }
        if let Some(theme) = theme {
            settings.theme = theme;
        }
        settings.save(&self.storage)?;
        Ok(settings.clone())
    }

    /// Attach a listener notified after every storage write
    pub fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        self.storage.subscribe(on_change)
    }

    fn lock_data(&self) -> MutexGuard<'_, TodoData> {
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn save_todos(&self, data: &TodoData) -> Result<()> {
        self.storage.set_state(storage::keys::TODOS, data.read_all())
    }

    // ---- todo store ----

    /// Every stored todo, normalized, in storage order
    pub fn read_all(&self) -> Vec<TodoItem> {
        self.lock_data().read_all().to_vec()
    }

    pub fn find_todo(&self, id: &str) -> Option<TodoItem> {
        self.lock_data().find_by_id(id).cloned()
    }

    /// Insert or replace a todo and persist the store
    ///
    /// # Returns
    /// The todo as stored (`created_at` of an existing todo is kept)
    pub fn upsert_todo(&self, todo: TodoItem) -> Result<TodoItem> {
        let mut data = self.lock_data();
        let stored = data.upsert(todo, date::now_utc());
        self.save_todos(&data)?;
        Ok(stored)
    }

    /// Remove a todo; removing an unknown id is a no-op but still persists
    pub fn remove_todo(&self, id: &str) -> Result<Option<TodoItem>> {
        let mut data = self.lock_data();
        let removed = data.remove(id);
        self.save_todos(&data)?;
        Ok(removed)
    }

    /// Advance a todo's status (todo -> doing -> done -> todo)
    pub fn cycle_todo(&self, id: &str) -> Result<Option<TodoItem>> {
        let mut data = self.lock_data();
        if data.cycle_status(id, date::now_utc()).is_none() {
            return Ok(None);
        }
        self.save_todos(&data)?;
        Ok(data.find_by_id(id).cloned())
    }

    pub fn list_todos(&self, filter: &TodoFilter) -> Vec<TodoItem> {
        self.lock_data().list(filter)
    }

    // ---- schedule ----

    /// Occurrences of every todo inside `[start, end]`
    pub fn materialize(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Occurrence> {
        let data = self.lock_data();
        self.materializer().materialize(data.read_all(), start, end)
    }

    /// Like [`Planner::materialize`] with textual bounds; unparseable bounds
    /// give no occurrences
    pub fn materialize_iso(&self, start: &str, end: &str) -> Vec<Occurrence> {
        let data = self.lock_data();
        self.materializer()
            .materialize_iso(data.read_all(), start, end)
    }

    /// Stored manual events
    pub fn manual_events(&self) -> Vec<ScheduleEvent> {
        let raw = self
            .storage
            .get_value(storage::keys::EVENTS)
            .unwrap_or(Value::Null);
        schedule::normalize_events(&raw, self.tz())
    }

    pub fn add_event(&self, event: ScheduleEvent) -> Result<ScheduleEvent> {
        let mut events = self.manual_events();
        events.push(event.clone());
        self.storage.set_state(storage::keys::EVENTS, &events)?;
        Ok(event)
    }

    /// Todo occurrences and manual events in `[now, now + hours]`
    pub fn upcoming_events(&self, now: DateTime<Utc>, hours: i64) -> Vec<ScheduleEvent> {
        let manual = self.manual_events();
        let data = self.lock_data();
        schedule::list_upcoming_events(&self.materializer(), data.read_all(), &manual, now, hours)
    }

    /// Todo rows for a list view
    pub fn visible(&self, window: ListWindow, now: DateTime<Utc>) -> Vec<VisibleItem> {
        let active = self.lock_data().active();
        schedule::collect_visible(&self.materializer(), &active, window, now)
    }

    pub fn day_counts(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> BTreeMap<String, usize> {
        let data = self.lock_data();
        schedule::day_counts(&self.materializer(), data.read_all(), start, end)
    }

    // ---- holidays ----

    pub async fn holiday_map(&self, year: i32) -> HolidayMap {
        holiday::holiday_map(&self.storage, &self.holiday_config, year).await
    }

    /// Holiday entries for every year a calendar view over `[start, end]` touches
    pub async fn holidays_between(&self, start: NaiveDate, end: NaiveDate) -> HolidayMap {
        let mut maps = Vec::new();
        for year in holiday::visible_years(start, end) {
            maps.push(self.holiday_map(year).await);
        }
        holiday::merge_holiday_maps(maps)
    }

    /// Refresh the cached holidays of a year from the configured payload files
    pub async fn sync_holidays(&self, year: i32) -> Result<SyncReport> {
        let chain = holiday::payload_chain(&self.holiday_config, year);
        if chain.is_empty() {
            bail!("No holiday payload files configured. Add holiday.payload_files to the config file");
        }
        holiday::sync_holidays(&self.storage, year, &chain, date::now_utc()).await
    }

    // ---- clock & editor ----

    /// Stored countdown, brought up to date with `now`
    ///
    /// # Returns
    /// The state and whether it finished during this refresh
    pub fn clock(&self, now: DateTime<Utc>) -> Result<(ClockState, bool)> {
        let mut clock = ClockState::load(&self.storage);
        let finished = clock.recalc(now);
        if finished {
            clock.save(&self.storage)?;
        }
        Ok((clock, finished))
    }

    pub fn save_clock(&self, clock: &ClockState) -> Result<()> {
        clock.save(&self.storage)
    }

    pub fn editor_docs(&self) -> EditorDocs {
        EditorDocs::load(&self.storage, self.language(), date::now_utc())
    }

    pub fn save_editor_docs(&self, docs: &EditorDocs) -> Result<()> {
        docs.save_all(&self.storage)
    }
}
