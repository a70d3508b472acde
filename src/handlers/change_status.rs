//! Status cycling and removal handlers

use crate::Planner;
use crate::validation;
use anyhow::{Result, bail};

impl Planner {
    /// Advance each todo to its next status (todo -> doing -> done -> todo;
    /// archived -> todo)
    ///
    /// Supports several IDs at once; unknown IDs are reported, not fatal
    /// unless every ID fails.
    pub async fn handle_cycle(&self, ids: Vec<String>) -> Result<String> {
        if ids.is_empty() {
            bail!("No IDs provided. Please specify at least one todo ID.");
        }

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for id in ids {
            let id = validation::normalize_id(&id)?;
            match self.cycle_todo(&id)? {
                Some(todo) => successes.push(format!("{}: now {}", todo.id, todo.status)),
                None => failures.push(format!("{}: not found", id)),
            }
        }
        summarize(successes, failures)
    }

    /// Remove todos permanently
    pub async fn handle_remove(&self, ids: Vec<String>) -> Result<String> {
        if ids.is_empty() {
            bail!("No IDs provided. Please specify at least one todo ID.");
        }

        let mut successes = Vec::new();
        let mut failures = Vec::new();
        for id in ids {
            let id = validation::normalize_id(&id)?;
            match self.remove_todo(&id)? {
                Some(todo) => successes.push(format!("{}: removed ({})", todo.id, todo.title)),
                None => failures.push(format!("{}: not found", id)),
            }
        }
        summarize(successes, failures)
    }
}

fn summarize(successes: Vec<String>, failures: Vec<String>) -> Result<String> {
    if successes.is_empty() {
        bail!("No todos changed:\n{}", failures.join("\n"));
    }

    let mut result = successes.join("\n");
    if !failures.is_empty() {
        result.push_str("\nFailed:\n");
        result.push_str(&failures.join("\n"));
    }
    Ok(result)
}
