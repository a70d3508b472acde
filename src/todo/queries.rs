//! Filtered listing of todos
//!
//! Filters combine with AND. Results are always sorted ascending by due time;
//! todos with the same due time keep their insertion order.

use super::item::{TodoItem, TodoStatus};
use super::todo_data::TodoData;
use chrono::{DateTime, Utc};

/// Listing filter for [`TodoData::list`]
#[derive(Debug, Clone, Default)]
pub struct TodoFilter {
    /// Keep only these statuses (empty = any status)
    pub statuses: Vec<TodoStatus>,
    /// Keep archived todos; without it archived todos are dropped whatever `statuses` says
    pub include_archived: bool,
    /// Case-insensitive substring over title, note and tags
    pub search: Option<String>,
    /// Drop todos due before this instant
    pub due_from: Option<DateTime<Utc>>,
    /// Drop todos due after this instant
    pub due_to: Option<DateTime<Utc>>,
}

impl TodoFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: TodoStatus) -> Self {
        self.statuses = vec![status];
        self
    }

    pub fn statuses(mut self, statuses: impl IntoIterator<Item = TodoStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn include_archived(mut self, include: bool) -> Self {
        self.include_archived = include;
        self
    }

    pub fn search(mut self, keyword: impl Into<String>) -> Self {
        self.search = Some(keyword.into());
        self
    }

    pub fn due_between(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.due_from = from;
        self.due_to = to;
        self
    }

    /// Check whether a single todo passes every filter
    pub fn matches(&self, todo: &TodoItem) -> bool {
        if !self.include_archived && todo.status == TodoStatus::archived {
            return false;
        }

        if !self.statuses.is_empty() && !self.statuses.contains(&todo.status) {
            return false;
        }

        if let Some(keyword) = self.search.as_deref() {
            let keyword = keyword.trim().to_lowercase();
            if !keyword.is_empty() && !todo.search_text().to_lowercase().contains(&keyword) {
                return false;
            }
        }

        if self.due_from.is_some_and(|from| todo.due_at < from) {
            return false;
        }
        if self.due_to.is_some_and(|to| todo.due_at > to) {
            return false;
        }
        true
    }
}

impl TodoData {
    /// List todos matching a filter, ascending by due time
    ///
    /// # Arguments
    /// * `filter` - Status, archive, keyword and due-range filter
    ///
    /// # Returns
    /// Cloned todos sorted by `due_at`
    pub fn list(&self, filter: &TodoFilter) -> Vec<TodoItem> {
        let mut todos: Vec<TodoItem> = self
            .todos
            .iter()
            .filter(|todo| filter.matches(todo))
            .cloned()
            .collect();
        todos.sort_by_key(|todo| todo.due_at);
        todos
    }

    /// Non-archived todos, ascending by due time
    pub fn active(&self) -> Vec<TodoItem> {
        self.list(&TodoFilter::new())
    }
}
