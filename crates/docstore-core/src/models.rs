//! Document data models.
//!
//! A [`Document`] is the full stored record. A [`DocumentSummary`] is its
//! listing projection, without `content`. Both serialize to the on-disk
//! JSON shape, with timestamps as RFC 3339 strings in UTC.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Prefix shared by every generated document id.
pub const ID_PREFIX: &str = "document_";

/// Number of hex characters following [`ID_PREFIX`].
const ID_HEX_LEN: usize = 24;

/// Longest id, in bytes, that still fits a `<id>.json` file name on common
/// filesystems (255-byte name limit).
pub const MAX_ID_LEN: usize = 255 - ".json".len();

/// A full document record, one per file on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing projection of a [`Document`]. Stored as an index entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Project this record onto its index entry.
    pub fn summary(&self) -> DocumentSummary {
        DocumentSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl From<&Document> for DocumentSummary {
    fn from(doc: &Document) -> Self {
        doc.summary()
    }
}

/// Generate a fresh document id of the form `document_<24 hex chars>`.
pub fn new_document_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}{}", ID_PREFIX, &hex[..ID_HEX_LEN])
}

/// Check that `id` can name a record.
///
/// Ids become file names, so besides being non-empty they must not contain
/// path separators, start with a dot, or exceed [`MAX_ID_LEN`] bytes.
pub fn validate_id(id: &str) -> StoreResult<()> {
    if id.trim().is_empty() {
        return Err(StoreError::Validation(
            "document must have a non-empty 'id' to be saved".to_string(),
        ));
    }
    if id.starts_with('.') || id.contains(&['/', '\\', '\0'][..]) {
        return Err(StoreError::Validation(format!(
            "document id '{}' is not a valid record name",
            id
        )));
    }
    if id.len() > MAX_ID_LEN {
        return Err(StoreError::Validation(format!(
            "document id is {} bytes long; the limit is {}",
            id.len(),
            MAX_ID_LEN
        )));
    }
    Ok(())
}

/// Sort summaries most recently updated first; equal timestamps fall back
/// to id order so listings are deterministic.
pub fn sort_by_recency(summaries: &mut [DocumentSummary]) {
    summaries.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
