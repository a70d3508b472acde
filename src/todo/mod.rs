//! Todo domain model and in-memory store
//!
//! Split into submodules:
//! - `item`: the todo record and its enums (repeat rule, status, priority)
//! - `todo_data`: the collection with upsert/remove/cycle operations
//! - `queries`: filtered listing
//! - `serde_impl`: lenient decoding of persisted records

mod item;
mod queries;
mod serde_impl;
mod todo_data;

pub use item::{
    DEFAULT_TODO_TITLE, MAX_TAGS, Priority, RepeatRule, TodoItem, TodoStatus, generate_todo_id,
    normalize_tags, parse_tag_list,
};
pub use queries::TodoFilter;
pub use serde_impl::{normalize_todo, normalize_todos};
pub(crate) use serde_impl::{value_instant, value_text};
pub use todo_data::TodoData;
