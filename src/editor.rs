//! Markdown editor documents
//!
//! The document list is never empty: loading an empty or malformed list seeds
//! a welcome document, and removing the last document re-seeds it. Stored
//! records are read one at a time through [`normalize_doc`], so an old or
//! partial record never costs the rest of the list.

use crate::config::Language;
use crate::storage::{Storage, keys};
use crate::todo::{value_instant, value_text};
use anyhow::{Result, anyhow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub const WELCOME_DOC_ID: &str = "doc_default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditorDoc {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(rename = "updatedAtISO")]
    pub updated_at: DateTime<Utc>,
}

impl EditorDoc {
    pub fn welcome(language: Language, now: DateTime<Utc>) -> Self {
        Self {
            id: WELCOME_DOC_ID.to_string(),
            title: language.pick("欢迎文档", "Welcome Document").to_string(),
            content: language
                .pick(
                    "# 欢迎使用编辑器\n\n- 支持 Markdown\n- 可导出 MD / TXT\n",
                    "# Welcome to the Editor\n\n- Markdown documents\n- Export to MD / TXT\n",
                )
                .to_string(),
            updated_at: now,
        }
    }
}

pub fn generate_doc_id() -> String {
    format!("doc_{}", Uuid::new_v4())
}

fn untitled(language: Language) -> String {
    language.pick("未命名文档", "Untitled document").to_string()
}

/// Normalize one stored document
///
/// # Returns
/// `None` for records that are not objects. Otherwise a document whose
/// missing id is generated, blank title becomes "Untitled document", missing
/// content is empty and unreadable `updatedAtISO` becomes `now`.
pub fn normalize_doc(raw: &Value, language: Language, now: DateTime<Utc>) -> Option<EditorDoc> {
    let fields = raw.as_object()?;
    let title = value_text(fields.get("title"))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| untitled(language));

    Some(EditorDoc {
        id: value_text(fields.get("id"))
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(generate_doc_id),
        title,
        content: value_text(fields.get("content")).unwrap_or_default(),
        updated_at: value_instant(fields.get("updatedAtISO"), chrono_tz::UTC).unwrap_or(now),
    })
}

/// Normalize a stored documents blob; anything other than an array yields none
pub fn normalize_docs(raw: &Value, language: Language, now: DateTime<Utc>) -> Vec<EditorDoc> {
    match raw {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| normalize_doc(item, language, now))
            .collect(),
        _ => Vec::new(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorDocs {
    docs: Vec<EditorDoc>,
    language: Language,
}

impl EditorDocs {
    /// Load the stored documents, seeding the welcome document when none exist
    pub fn load(storage: &Storage, language: Language, now: DateTime<Utc>) -> Self {
        let docs = storage
            .get_value(keys::EDITOR_DOCS)
            .map(|raw| normalize_docs(&raw, language, now))
            .unwrap_or_default();
        Self::from_docs(docs, language, now)
    }

    pub fn from_docs(docs: Vec<EditorDoc>, language: Language, now: DateTime<Utc>) -> Self {
        let docs = if docs.is_empty() {
            vec![EditorDoc::welcome(language, now)]
        } else {
            docs
        };
        Self { docs, language }
    }

    pub fn save_all(&self, storage: &Storage) -> Result<()> {
        storage.set_state(keys::EDITOR_DOCS, &self.docs)
    }

    pub fn docs(&self) -> &[EditorDoc] {
        &self.docs
    }

    pub fn get(&self, id: &str) -> Option<&EditorDoc> {
        self.docs.iter().find(|doc| doc.id == id)
    }

    /// Add an empty document at the front of the list
    pub fn create(&mut self, now: DateTime<Utc>) -> &EditorDoc {
        let number = self.docs.len() + 1;
        let title = match self.language {
            Language::zh => format!("新文档 {}", number),
            Language::en => format!("New Document {}", number),
        };
        self.docs.insert(
            0,
            EditorDoc {
                id: generate_doc_id(),
                title,
                content: String::new(),
                updated_at: now,
            },
        );
        &self.docs[0]
    }

    /// Overwrite a document's title and content
    ///
    /// # Arguments
    /// * `title` - New title; blank means "Untitled document"
    pub fn save(
        &mut self,
        id: &str,
        title: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Result<&EditorDoc> {
        let language = self.language;
        let doc = self
            .docs
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or_else(|| anyhow!("Document '{}' not found", id))?;
        let title = title.trim();
        doc.title = if title.is_empty() {
            untitled(language)
        } else {
            title.to_string()
        };
        doc.content = content.to_string();
        doc.updated_at = now;
        Ok(&*doc)
    }

    /// Remove a document; the welcome document comes back if none remain
    ///
    /// # Returns
    /// Whether a document with `id` existed
    pub fn remove(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        let before = self.docs.len();
        self.docs.retain(|doc| doc.id != id);
        let removed = self.docs.len() != before;
        if self.docs.is_empty() {
            self.docs.push(EditorDoc::welcome(self.language, now));
        }
        removed
    }
}
