//! Storage abstraction for docstore.
//!
//! The [`DocumentStore`] trait is the narrow interface the service layer
//! talks to. Implementations must be `Send + Sync` so a single instance can
//! be shared across request-handling threads.
//!
//! Operations are synchronous and may block on I/O. Async callers should run
//! them on a blocking thread pool.

pub mod memory;

use crate::error::StoreResult;
use crate::models::{Document, DocumentSummary};

/// Abstract document store.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`save`](DocumentStore::save) | Write a record and upsert its index entry |
/// | [`load`](DocumentStore::load) | Read one record by id |
/// | [`list`](DocumentStore::list) | All summaries, most recently updated first |
/// | [`update`](DocumentStore::update) | Load, mutate and save one record under its lock |
pub trait DocumentStore: Send + Sync {
    /// Persist `doc`, replacing any prior record with the same id, and
    /// return it unchanged.
    ///
    /// Fails with `Validation` when the id is empty or unusable, and with
    /// `Storage` when any write fails.
    fn save(&self, doc: &Document) -> StoreResult<Document>;

    /// Read the record for `id`.
    ///
    /// Fails with `NotFound` when no record exists, and with `Storage` when a
    /// record exists but cannot be read or parsed.
    fn load(&self, id: &str) -> StoreResult<Document>;

    /// All summaries ordered by `updated_at` descending. An empty store
    /// yields an empty list.
    fn list(&self) -> StoreResult<Vec<DocumentSummary>>;

    /// Apply `mutate` to the stored record for `id` and persist the result.
    ///
    /// Concurrent updates of the same id are serialized, so each mutation
    /// sees the previous one's result. Changing the id is rejected.
    fn update(&self, id: &str, mutate: &mut dyn FnMut(&mut Document)) -> StoreResult<Document>;
}
