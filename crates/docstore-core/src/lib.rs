//! # docstore core
//!
//! Storage-agnostic building blocks for docstore: the document record and
//! summary types, the [`store::DocumentStore`] trait, its error taxonomy,
//! and an in-memory implementation.
//!
//! This crate performs no filesystem I/O. The durable, file-backed store
//! lives in the `docstore` crate.

pub mod error;
pub mod models;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use models::{Document, DocumentSummary};
pub use store::DocumentStore;
