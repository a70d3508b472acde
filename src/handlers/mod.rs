//! CLI command handlers
//!
//! Each handler validates raw command-line input, calls into [`crate::Planner`]
//! and returns the text to print. Handlers for related commands share a file.

pub mod add;
pub mod change_status;
pub mod countdown;
pub mod docs;
pub mod holiday;
pub mod list;
pub mod schedule;
pub mod settings;
pub mod update;
