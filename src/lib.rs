//! # docstore
//!
//! A small document management service backed by a durable, file-based
//! store.
//!
//! Documents are saved one JSON file per record, with a summary index kept
//! alongside for cheap listings. Every file is replaced atomically
//! (temp file + rename), so a crash never leaves a partially written record
//! or index behind.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────┐
//! │   CLI    │   │   HTTP   │
//! │(docstore)│   │  (axum)  │
//! └────┬─────┘   └────┬─────┘
//!      └──────┬───────┘
//!             ▼
//!     ┌───────────────┐      ┌──────────────────────┐
//!     │DocumentService│─────▶│ FileStore            │
//!     │ ids, clocks   │      │ documents/{id}.json  │
//!     └───────────────┘      │ index.json           │
//!                            └──────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! docstore create --title "Notes" --content "hello"
//! docstore list
//! docstore get document_0123456789abcdef01234567
//! docstore serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`file_store`] | Durable file-backed store |
//! | [`service`] | Id and timestamp assignment |
//! | [`server`] | JSON HTTP server |
//! | [`commands`] | CLI command implementations |
//!
//! Models, the store trait and the error taxonomy live in `docstore-core`
//! and are re-exported here.

pub mod commands;
pub mod config;
pub mod file_store;
pub mod server;
pub mod service;

pub use docstore_core::store::memory::InMemoryStore;
pub use docstore_core::{Document, DocumentStore, DocumentSummary, StoreError, StoreResult};
pub use file_store::FileStore;
pub use service::{DocumentPatch, DocumentService, NewDocument};
