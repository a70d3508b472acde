//! Keyed JSON blob storage
//!
//! Each logical record type lives in its own file, `<data dir>/<key>.json`.
//! Writes overwrite the whole blob and then notify subscribers. Reads never
//! fail on bad content: a missing or malformed blob yields the caller's
//! fallback.

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Storage keys of every persisted record type
pub mod keys {
    pub const SETTINGS: &str = "bxg.tools.v1.settings";
    pub const TODOS: &str = "bxg.tools.v1.todos";
    pub const EVENTS: &str = "bxg.tools.v1.events";
    pub const EDITOR_DOCS: &str = "bxg.tools.v1.editor_docs";
    pub const CLOCK: &str = "bxg.tools.v1.clock";
    pub const HOLIDAY_CACHE: &str = "bxg.tools.v1.holiday_cache";
}

/// A write notification
#[derive(Debug, Clone, PartialEq)]
pub struct StateChange {
    pub key: String,
    pub value: Value,
}

type Listener = Arc<dyn Fn(&StateChange) + Send + Sync>;
type Listeners = Mutex<Vec<(u64, Listener)>>;

/// Handle returned by [`Storage::subscribe`]
///
/// The listener stays attached until [`Subscription::unsubscribe`] is called
/// or the handle is dropped.
#[must_use = "dropping a Subscription detaches its listener"]
pub struct Subscription {
    id: u64,
    listeners: Weak<Listeners>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        drop(self);
    }

    fn detach(&self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|(id, _)| *id != self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

pub struct Storage {
    dir: PathBuf,
    listeners: Arc<Listeners>,
    next_listener_id: AtomicU64,
}

impl Storage {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_listener_id: AtomicU64::new(1),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File backing a key
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    /// Read a blob as raw JSON
    ///
    /// # Returns
    /// `None` when the blob is missing or unreadable; malformed content is logged
    pub fn get_value(&self, key: &str) -> Option<Value> {
        let path = self.path_for(key);
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read stored state");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored state is not valid JSON, using fallback");
                None
            }
        }
    }

    /// Read a typed blob, falling back when it is missing or malformed
    ///
    /// # Arguments
    /// * `key` - Storage key (see [`keys`])
    /// * `fallback` - Value returned when the blob cannot be used
    pub fn get_state<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let Some(value) = self.get_value(key) else {
            return fallback;
        };
        match serde_json::from_value(value) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(key, error = %e, "stored state has unexpected shape, using fallback");
                fallback
            }
        }
    }

    /// Overwrite a blob and notify subscribers
    pub fn set_state<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)
            .with_context(|| format!("Failed to serialize state '{}'", key))?;
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory {}", self.dir.display()))?;
        let path = self.path_for(key);
        let content = serde_json::to_string_pretty(&value)?;
        fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!(key, path = %path.display(), "state saved");

        self.notify(&StateChange {
            key: key.to_string(),
            value,
        });
        Ok(())
    }

    /// Write `value` only when the key has never been stored
    ///
    /// # Returns
    /// `true` when the default was written
    pub fn set_default<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<bool> {
        if self.contains(key) {
            return Ok(false);
        }
        self.set_state(key, value)?;
        Ok(true)
    }

    /// Attach a change listener
    ///
    /// Listeners run synchronously after every successful [`Storage::set_state`],
    /// in subscription order. They may subscribe or unsubscribe other listeners.
    pub fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: Fn(&StateChange) + Send + Sync + 'static,
    {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, Arc::new(on_change)));
        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn notify(&self, change: &StateChange) {
        // Snapshot so listeners can (un)subscribe without deadlocking
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in listeners {
            listener(change);
        }
    }
}
