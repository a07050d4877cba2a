//! Process-wide store context
//!
//! Owns the single storage-engine handle for the process. `open` is
//! idempotent: concurrent callers converge on one `Arc<Database>`. `close`
//! flushes and drops the handle; a later `open` builds a fresh one. There is
//! no module-level singleton: the context is constructed explicitly and
//! passed to whoever needs the handle.

use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use quill_core::Result;
use tracing::debug;

use crate::database::Database;

/// Configuration for the local store.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Snapshot file path; `None` opens an in-memory store.
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// Durable store at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: Some(path.into()),
        }
    }

    /// In-memory store (tests, previews).
    pub fn in_memory() -> Self {
        StoreConfig { path: None }
    }
}

/// Owner of the process-wide `Arc<Database>` handle.
pub struct Context {
    config: StoreConfig,
    handle: Mutex<Option<Arc<Database>>>,
}

impl Context {
    pub fn new(config: StoreConfig) -> Self {
        Context {
            config,
            handle: Mutex::new(None),
        }
    }

    /// Open the store, or return the already-open handle.
    ///
    /// The lock is held across the open so racing callers converge on a
    /// single `Database` with no duplicate schema creation.
    pub fn open(&self) -> Result<Arc<Database>> {
        let mut handle = self.handle.lock();
        if let Some(db) = handle.as_ref() {
            return Ok(Arc::clone(db));
        }

        let db = match &self.config.path {
            Some(path) => Database::open(path)?,
            None => Database::in_memory()?,
        };
        let db = Arc::new(db);
        *handle = Some(Arc::clone(&db));
        debug!("store context opened");
        Ok(db)
    }

    /// Flush and release the handle. Idempotent; a no-op when closed.
    ///
    /// Callers still holding the `Arc` keep a usable database; the context
    /// just stops handing it out and will reopen from disk next time.
    pub fn close(&self) -> Result<()> {
        let mut handle = self.handle.lock();
        if let Some(db) = handle.take() {
            db.flush()?;
            debug!("store context closed");
        }
        Ok(())
    }

    /// True while a handle is open.
    pub fn is_open(&self) -> bool {
        self.handle.lock().is_some()
    }
}
