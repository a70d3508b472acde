use crate::todo::item::{TodoItem, TodoStatus};
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// In-memory todo collection
///
/// Mirrors the persisted todos blob. Mutations here never touch storage; the
/// [`Planner`](crate::Planner) writes the collection back after each change.
#[derive(Debug, Clone, Default)]
pub struct TodoData {
    /// All todos in insertion order
    ///
    /// Insertion order is the order written back to storage, so the stored
    /// blob only changes where a todo actually changed.
    pub(crate) todos: Vec<TodoItem>,

    /// id -> status index for O(1) existence checks
    ///
    /// Kept in sync with `todos` by every mutating method. Not persisted.
    pub(crate) todo_map: HashMap<String, TodoStatus>,
}

impl TodoData {
    /// Create a new empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from loaded todos
    ///
    /// A repeated id keeps the position of its first record and the contents
    /// of its last one, so the result holds exactly one todo per id.
    pub fn from_todos(todos: Vec<TodoItem>) -> Self {
        let mut data = Self::new();
        for todo in todos {
            if let Some(pos) = data.position(&todo.id) {
                data.todo_map.insert(todo.id.clone(), todo.status);
                data.todos[pos] = todo;
            } else {
                data.push(todo);
            }
        }
        data
    }

    fn push(&mut self, todo: TodoItem) {
        self.todo_map.insert(todo.id.clone(), todo.status);
        self.todos.push(todo);
    }

    fn position(&self, id: &str) -> Option<usize> {
        if !self.todo_map.contains_key(id) {
            return None;
        }
        self.todos.iter().position(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.todo_map.contains_key(id)
    }

    /// Every todo, archived ones included, in insertion order
    pub fn read_all(&self) -> &[TodoItem] {
        &self.todos
    }

    /// Find a todo by its ID
    ///
    /// # Arguments
    /// * `id` - The todo ID to search for
    ///
    /// # Returns
    /// An optional reference to the todo if found
    pub fn find_by_id(&self, id: &str) -> Option<&TodoItem> {
        self.position(id).map(|pos| &self.todos[pos])
    }

    /// Insert or replace a todo by id
    ///
    /// The incoming todo is normalized first. When the id already exists every
    /// field is replaced except `created_at`, which keeps the stored value;
    /// `updated_at` is always set to `now`.
    ///
    /// # Arguments
    /// * `todo` - The todo to store
    /// * `now` - Update instant
    ///
    /// # Returns
    /// The todo as stored
    pub fn upsert(&mut self, todo: TodoItem, now: DateTime<Utc>) -> TodoItem {
        let mut todo = todo.normalized();
        todo.updated_at = now;

        if let Some(pos) = self.position(&todo.id) {
            todo.created_at = self.todos[pos].created_at;
            self.todo_map.insert(todo.id.clone(), todo.status);
            self.todos[pos] = todo.clone();
        } else {
            self.push(todo.clone());
        }
        todo
    }

    /// Remove a todo and return it
    ///
    /// # Arguments
    /// * `id` - The todo ID to remove
    ///
    /// # Returns
    /// The removed todo if found
    pub fn remove(&mut self, id: &str) -> Option<TodoItem> {
        let pos = self.position(id)?;
        self.todo_map.remove(id);
        Some(self.todos.remove(pos))
    }

    /// Advance a todo to its next status (todo -> doing -> done -> todo)
    ///
    /// # Returns
    /// The new status, or `None` if the todo does not exist
    pub fn cycle_status(&mut self, id: &str, now: DateTime<Utc>) -> Option<TodoStatus> {
        let pos = self.position(id)?;
        let todo = &mut self.todos[pos];
        todo.status = todo.status.cycle();
        todo.updated_at = now;
        let status = todo.status;
        self.todo_map.insert(id.to_string(), status);
        Some(status)
    }

    /// Count todos with the given status
    pub fn count_by_status(&self, status: TodoStatus) -> usize {
        self.todo_map.values().filter(|s| **s == status).count()
    }
}
