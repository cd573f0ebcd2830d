//! Document service: id and timestamp assignment over a [`DocumentStore`].
//!
//! Used by both the CLI commands and the HTTP handlers. Store errors pass
//! through unchanged so callers can tell not-found from internal failures.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use docstore_core::models::new_document_id;
use docstore_core::{Document, DocumentStore, DocumentSummary, StoreResult};

/// Payload for creating a document.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
    pub title: String,
    pub content: String,
}

/// Partial update. Only the fields that are `Some` are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DocumentPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
}

impl DocumentService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Create and persist a new document with a fresh id.
    pub fn create(&self, input: NewDocument) -> StoreResult<Document> {
        let now = Utc::now();
        let doc = Document {
            id: new_document_id(),
            title: input.title,
            content: input.content,
            created_at: now,
            updated_at: now,
        };
        let stored = self.store.save(&doc)?;
        tracing::info!(id = %stored.id, "document created");
        Ok(stored)
    }

    pub fn get(&self, id: &str) -> StoreResult<Document> {
        self.store.load(id)
    }

    /// All documents as summaries, most recently updated first.
    pub fn list(&self) -> StoreResult<Vec<DocumentSummary>> {
        self.store.list()
    }

    /// Apply `patch` to an existing document and bump `updated_at`.
    ///
    /// `updated_at` always moves forward, even if the wall clock has not
    /// advanced past the stored value.
    pub fn update(&self, id: &str, patch: DocumentPatch) -> StoreResult<Document> {
        let updated = self.store.update(id, &mut |doc| {
            if let Some(title) = &patch.title {
                doc.title = title.clone();
            }
            if let Some(content) = &patch.content {
                doc.content = content.clone();
            }
            doc.updated_at = next_updated_at(doc.updated_at);
        })?;
        tracing::info!(id = %updated.id, "document updated");
        Ok(updated)
    }
}

fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}
