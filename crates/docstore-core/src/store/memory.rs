//! In-memory [`DocumentStore`] implementation for tests and embedding.
//!
//! Uses a `HashMap` behind a `parking_lot::RwLock`. Nothing is persisted;
//! the summary listing is projected from the records on each call.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::models::{sort_by_recency, validate_id, Document, DocumentSummary};

use super::DocumentStore;

/// In-memory store for tests and short-lived processes.
pub struct InMemoryStore {
    docs: RwLock<HashMap<String, Document>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.docs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.read().is_empty()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore for InMemoryStore {
    fn save(&self, doc: &Document) -> StoreResult<Document> {
        validate_id(&doc.id)?;
        self.docs.write().insert(doc.id.clone(), doc.clone());
        Ok(doc.clone())
    }

    fn load(&self, id: &str) -> StoreResult<Document> {
        self.docs
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list(&self) -> StoreResult<Vec<DocumentSummary>> {
        let mut summaries: Vec<DocumentSummary> =
            self.docs.read().values().map(Document::summary).collect();
        sort_by_recency(&mut summaries);
        Ok(summaries)
    }

    fn update(&self, id: &str, mutate: &mut dyn FnMut(&mut Document)) -> StoreResult<Document> {
        let mut docs = self.docs.write();
        let current = docs
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        let mut next = current.clone();
        mutate(&mut next);
        if next.id != id {
            return Err(StoreError::Validation(format!(
                "document id is immutable: '{}' cannot become '{}'",
                id, next.id
            )));
        }
        docs.insert(next.id.clone(), next.clone());
        Ok(next)
    }
}
