use crate::date::resolve_local;
use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Title given to todos saved without one
pub const DEFAULT_TODO_TITLE: &str = "Untitled task";

/// Maximum number of tags kept on a todo
pub const MAX_TAGS: usize = 8;

/// Repeat rule of a todo
///
/// Uses lowercase naming to match the persisted JSON format.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RepeatRule {
    /// One-shot todo
    #[default]
    none,
    /// Every hour
    hourly,
    /// Every calendar day, same wall-clock time
    daily,
    /// Every 7 calendar days, same wall-clock time
    weekly,
    /// Every calendar month, same day number (overflowing days carry into the next month)
    monthly,
}

impl RepeatRule {
    pub fn is_repeating(self) -> bool {
        self != RepeatRule::none
    }

    /// Advance an instant by one step of this rule
    ///
    /// Day-based and month-based steps are applied to the wall-clock time in
    /// `tz`, so a daily todo at 09:00 stays at 09:00 across DST changes.
    /// Monthly steps keep the day number and let it overflow: Jan 31 advances to
    /// Mar 2 (leap year) or Mar 3, never to the last day of February.
    ///
    /// # Returns
    /// `None` for `RepeatRule::none` or when the result leaves chrono's range
    pub fn advance(self, instant: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
        match self {
            RepeatRule::none => None,
            RepeatRule::hourly => instant.checked_add_signed(Duration::hours(1)),
            RepeatRule::daily => shift_days(instant, tz, 1),
            RepeatRule::weekly => shift_days(instant, tz, 7),
            RepeatRule::monthly => shift_month(instant, tz),
        }
    }
}

fn shift_days(instant: DateTime<Utc>, tz: Tz, days: u64) -> Option<DateTime<Utc>> {
    let local = instant.with_timezone(&tz).naive_local();
    let shifted = local.checked_add_days(Days::new(days))?;
    Some(resolve_local(tz, shifted))
}

fn shift_month(instant: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
    let local = instant.with_timezone(&tz).naive_local();
    let (year, month) = if local.month() == 12 {
        (local.year() + 1, 1)
    } else {
        (local.year(), local.month() + 1)
    };
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let date = first.checked_add_days(Days::new(u64::from(local.day() - 1)))?;
    Some(resolve_local(tz, date.and_time(local.time())))
}

impl FromStr for RepeatRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(RepeatRule::none),
            "hourly" => Ok(RepeatRule::hourly),
            "daily" => Ok(RepeatRule::daily),
            "weekly" => Ok(RepeatRule::weekly),
            "monthly" => Ok(RepeatRule::monthly),
            _ => Err(format!(
                "Invalid repeat '{}'. Valid options are: none, hourly, daily, weekly, monthly",
                s
            )),
        }
    }
}

impl fmt::Display for RepeatRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Todo status
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TodoStatus {
    /// Not started
    #[default]
    todo,
    /// In progress
    doing,
    /// Completed
    done,
    /// Hidden from lists and never materialized
    archived,
}

impl TodoStatus {
    /// Next status when the user clicks through: todo -> doing -> done -> todo
    ///
    /// Archived todos come back as `todo`.
    pub fn cycle(self) -> Self {
        match self {
            TodoStatus::todo => TodoStatus::doing,
            TodoStatus::doing => TodoStatus::done,
            TodoStatus::done | TodoStatus::archived => TodoStatus::todo,
        }
    }
}

impl FromStr for TodoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TodoStatus::todo),
            "doing" => Ok(TodoStatus::doing),
            "done" => Ok(TodoStatus::done),
            "archived" => Ok(TodoStatus::archived),
            _ => Err(format!(
                "Invalid status '{}'. Valid options are: todo, doing, done, archived",
                s
            )),
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    low,
    #[default]
    medium,
    high,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::low),
            "medium" => Ok(Priority::medium),
            "high" => Ok(Priority::high),
            _ => Err(format!(
                "Invalid priority '{}'. Valid options are: low, medium, high",
                s
            )),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A persisted todo
///
/// For repeating todos `due_at` is the anchor: the first occurrence, from which
/// every later one is derived (see [`crate::schedule::Materializer`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Unique identifier, immutable after creation (e.g. "todo_6f1c...")
    pub id: String,
    pub title: String,
    /// Free-form note, may be empty
    pub note: String,
    /// Due instant; anchor occurrence for repeating todos
    #[serde(rename = "dueAtISO")]
    pub due_at: DateTime<Utc>,
    pub repeat: RepeatRule,
    pub status: TodoStatus,
    pub priority: Priority,
    /// Up to [`MAX_TAGS`] short labels
    pub tags: Vec<String>,
    /// Creation instant, never changed by updates
    #[serde(rename = "createdAtISO")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAtISO")]
    pub updated_at: DateTime<Utc>,
}

impl TodoItem {
    /// Create a todo with a fresh id and default repeat/status/priority
    ///
    /// # Arguments
    /// * `title` - Todo title (blank titles become [`DEFAULT_TODO_TITLE`])
    /// * `due_at` - Due instant
    /// * `now` - Creation instant
    pub fn new(title: impl Into<String>, due_at: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        Self {
            id: generate_todo_id(),
            title: title.into(),
            note: String::new(),
            due_at,
            repeat: RepeatRule::none,
            status: TodoStatus::todo,
            priority: Priority::medium,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
        .normalized()
    }

    /// Apply the same cleanup every stored todo goes through
    ///
    /// Trims title, note and id, replaces a blank title, and cleans tags.
    pub fn normalized(mut self) -> Self {
        self.id = self.id.trim().to_string();
        if self.id.is_empty() {
            self.id = generate_todo_id();
        }
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            self.title = DEFAULT_TODO_TITLE.to_string();
        }
        self.note = self.note.trim().to_string();
        self.tags = normalize_tags(self.tags.iter().map(String::as_str));
        self
    }

    /// Text matched by free-text search: title, note and tags separated by spaces
    pub fn search_text(&self) -> String {
        format!("{} {} {}", self.title, self.note, self.tags.join(" "))
    }
}

/// Generate a new unique todo id
pub fn generate_todo_id() -> String {
    format!("todo_{}", uuid::Uuid::new_v4())
}

/// Trim tags, drop blank ones and keep at most [`MAX_TAGS`]
pub fn normalize_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    tags.into_iter()
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .take(MAX_TAGS)
        .map(str::to_string)
        .collect()
}

/// Parse a comma-separated tag list (e.g. "work, home")
pub fn parse_tag_list(value: &str) -> Vec<String> {
    normalize_tags(value.split(','))
}
