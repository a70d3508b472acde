//! Editor document handlers

use crate::Planner;
use crate::date;
use crate::formatting;
use crate::validation;
use anyhow::{Result, anyhow};

impl Planner {
    pub async fn handle_docs_list(&self) -> Result<String> {
        let docs = self.editor_docs();
        Ok(formatting::format_docs(docs.docs(), self.tz()))
    }

    pub async fn handle_docs_new(&self) -> Result<String> {
        let mut docs = self.editor_docs();
        let id = docs.create(date::now_utc()).id.clone();
        self.save_editor_docs(&docs)?;
        Ok(format!("Document created with ID: {}", id))
    }

    /// Print a document's markdown source
    pub async fn handle_docs_show(&self, id: String) -> Result<String> {
        let id = validation::normalize_id(&id)?;
        let docs = self.editor_docs();
        let doc = docs
            .get(&id)
            .ok_or_else(|| anyhow!("Document '{}' not found", id))?;
        Ok(format!("# {}\n\n{}", doc.title, doc.content))
    }

    pub async fn handle_docs_save(
        &self,
        id: String,
        title: String,
        content: String,
    ) -> Result<String> {
        let id = validation::normalize_id(&id)?;
        let mut docs = self.editor_docs();
        let title = docs.save(&id, &title, &content, date::now_utc())?.title.clone();
        self.save_editor_docs(&docs)?;
        Ok(format!("Document {} saved ({})", id, title))
    }

    pub async fn handle_docs_remove(&self, id: String) -> Result<String> {
        let id = validation::normalize_id(&id)?;
        let mut docs = self.editor_docs();
        if !docs.remove(&id, date::now_utc()) {
            return Err(anyhow!("Document '{}' not found", id));
        }
        self.save_editor_docs(&docs)?;
        Ok(format!("Document {} removed", id))
    }
}
