//! File-backed [`DocumentStore`] implementation.
//!
//! # On-disk layout
//!
//! ```text
//! <root>/
//!   documents/
//!     {id}.json     full record: { id, title, content, created_at, updated_at }
//!   index.json      { [id]: { id, title, created_at, updated_at } }
//! ```
//!
//! # Write protocol
//!
//! Every file is replaced atomically: the new bytes go to a uniquely named
//! `*.tmp` file in the destination directory, are fsynced, and the temp file
//! is renamed over the destination. Readers see either the old or the new
//! file, never a partial one.
//!
//! A save writes the record file first and only then upserts the index
//! entry. A crash between the two leaves a record that is not yet listed,
//! which [`FileStore::rebuild_index`] can repair. The index never lists a
//! record whose file is missing.
//!
//! # Locking
//!
//! The index read-modify-write is serialized by one mutex per store. Writes
//! to the same id are serialized by a per-id mutex, taken before the index
//! mutex. Different ids write their record files in parallel. A per-id
//! mutex is dropped from the table once no writer holds or waits on it, so
//! the table only grows with the number of concurrent writers.

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use docstore_core::models::{sort_by_recency, validate_id};
use docstore_core::{Document, DocumentStore, DocumentSummary, StoreError, StoreResult};

const DOCUMENTS_DIR: &str = "documents";
const INDEX_FILE: &str = "index.json";
const RECORD_EXT: &str = "json";

type Index = BTreeMap<String, DocumentSummary>;

/// Durable document store rooted at a base directory.
pub struct FileStore {
    root: PathBuf,
    documents_dir: PathBuf,
    index_path: PathBuf,
    index_lock: Mutex<()>,
    record_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl FileStore {
    /// Open the store at `root`, creating `root/documents` if needed.
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        let documents_dir = root.join(DOCUMENTS_DIR);
        fs::create_dir_all(&documents_dir).map_err(|e| {
            StoreError::storage(
                format!("failed to create {}", documents_dir.display()),
                e,
            )
        })?;
        let index_path = root.join(INDEX_FILE);

        Ok(Self {
            root,
            documents_dir,
            index_path,
            index_lock: Mutex::new(()),
            record_locks: Mutex::new(HashMap::new()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index_path(&self) -> &Path {
        &self.index_path
    }

    pub fn record_path(&self, id: &str) -> PathBuf {
        self.documents_dir.join(format!("{}.{}", id, RECORD_EXT))
    }

    /// Re-derive the index from the record files and replace it atomically.
    ///
    /// Returns the number of records indexed. A record file that cannot be
    /// read or parsed aborts the rebuild and leaves the old index in place.
    pub fn rebuild_index(&self) -> StoreResult<usize> {
        let _index_guard = self.index_lock.lock();

        let entries = fs::read_dir(&self.documents_dir).map_err(|e| {
            StoreError::storage(
                format!("failed to read {}", self.documents_dir.display()),
                e,
            )
        })?;

        let mut index = Index::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                StoreError::storage(
                    format!("failed to read {}", self.documents_dir.display()),
                    e,
                )
            })?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXT)
            {
                continue;
            }
            let doc = read_json::<Document>(&path)?;
            index.insert(doc.id.clone(), doc.summary());
        }

        self.write_index(&index)?;
        tracing::debug!(records = index.len(), path = %self.index_path.display(), "index rebuilt");
        Ok(index.len())
    }

    /// Run `f` while holding the per-id write lock for `id`.
    fn with_record_lock<T>(&self, id: &str, f: impl FnOnce() -> StoreResult<T>) -> StoreResult<T> {
        let lock = self
            .record_locks
            .lock()
            .entry(id.to_string())
            .or_default()
            .clone();
        let result = {
            let _record_guard = lock.lock();
            f()
        };

        // Clones are only handed out under the table lock, so a count of two
        // (table + ours) means nobody else holds or awaits this mutex.
        let mut locks = self.record_locks.lock();
        if Arc::strong_count(&lock) == 2 {
            locks.remove(id);
        }
        result
    }

    fn read_record(&self, id: &str) -> StoreResult<Document> {
        let path = self.record_path(id);
        match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                StoreError::storage(format!("failed to parse document '{}'", id), e)
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.to_string()))
            }
            Err(e) => Err(StoreError::storage(
                format!("failed to load document '{}'", id),
                e,
            )),
        }
    }

    fn read_index(&self) -> StoreResult<Index> {
        match fs::read(&self.index_path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StoreError::storage("failed to parse document index", e)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Index::new()),
            Err(e) => Err(StoreError::storage("failed to read document index", e)),
        }
    }

    fn write_index(&self, index: &Index) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(index)
            .map_err(|e| StoreError::storage("failed to serialize document index", e))?;
        write_atomic(&self.index_path, &bytes)
            .map_err(|e| StoreError::storage("failed to write document index", e))
    }

    /// Write the record, then upsert its summary. Caller holds the record lock.
    fn persist(&self, doc: &Document) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(doc).map_err(|e| {
            StoreError::storage(format!("failed to serialize document '{}'", doc.id), e)
        })?;
        write_atomic(&self.record_path(&doc.id), &bytes).map_err(|e| {
            StoreError::storage(format!("failed to save document '{}'", doc.id), e)
        })?;

        let _index_guard = self.index_lock.lock();
        let mut index = self.read_index()?;
        index.insert(doc.id.clone(), doc.summary());
        self.write_index(&index)
    }
}

impl DocumentStore for FileStore {
    fn save(&self, doc: &Document) -> StoreResult<Document> {
        validate_id(&doc.id)?;
        self.with_record_lock(&doc.id, || self.persist(doc))?;
        Ok(doc.clone())
    }

    fn load(&self, id: &str) -> StoreResult<Document> {
        if validate_id(id).is_err() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.read_record(id)
    }

    fn list(&self) -> StoreResult<Vec<DocumentSummary>> {
        let mut summaries: Vec<DocumentSummary> = self.read_index()?.into_values().collect();
        sort_by_recency(&mut summaries);
        Ok(summaries)
    }

    fn update(&self, id: &str, mutate: &mut dyn FnMut(&mut Document)) -> StoreResult<Document> {
        if validate_id(id).is_err() {
            return Err(StoreError::NotFound(id.to_string()));
        }
        self.with_record_lock(id, || {
            let mut doc = self.read_record(id)?;
            mutate(&mut doc);
            if doc.id != id {
                return Err(StoreError::Validation(format!(
                    "document id is immutable: '{}' cannot become '{}'",
                    id, doc.id
                )));
            }
            self.persist(&doc)?;
            Ok(doc)
        })
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let bytes = fs::read(path)
        .map_err(|e| StoreError::storage(format!("failed to read {}", path.display()), e))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| StoreError::storage(format!("failed to parse {}", path.display()), e))
}

/// Replace `dest` with `bytes` via a temp file and rename in the same
/// directory. On failure the temp file is removed and `dest` is untouched.
pub(crate) fn write_atomic(dest: &Path, bytes: &[u8]) -> io::Result<()> {
    let dir = dest.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent directory")
    })?;
    let file_name = dest
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no file name"))?;
    let tmp = dir.join(format!("{}.{}.tmp", file_name, Uuid::new_v4().simple()));
    replace_via(&tmp, dest, bytes)?;
    sync_dir(dir)
}

/// Write `bytes` to `tmp` and rename it over `dest`, removing `tmp` on failure.
fn replace_via(tmp: &Path, dest: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Err(e) = write_then_rename(tmp, dest, bytes) {
        // Best effort; the write error is what the caller needs.
        let _ = fs::remove_file(tmp);
        return Err(e);
    }
    Ok(())
}

fn write_then_rename(tmp: &Path, dest: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = OpenOptions::new().write(true).create_new(true).open(tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    drop(file);
    fs::rename(tmp, dest)
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
