//! Catalog of open index handles, one per embedding config.
//!
//! `open_or_create` is idempotent within a process: the same config always
//! yields the same [`IndexStore`] handle, so no duplicate file handles are
//! held against one index. Opening a handle never affects handles for other
//! configs.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use super::IndexStore;
use crate::error::Result;
use crate::registry::EmbeddingConfig;

pub struct IndexCatalog {
    db_dir: PathBuf,
    stores: Mutex<HashMap<EmbeddingConfig, Arc<IndexStore>>>,
}

impl IndexCatalog {
    pub fn new(db_dir: impl Into<PathBuf>) -> Self {
        Self {
            db_dir: db_dir.into(),
            stores: Mutex::new(HashMap::new()),
        }
    }

    /// Open (or create) the index for `config`, sized for `dimensions`.
    ///
    /// The storage location derives purely from the config, so the same
    /// (provider, model) pair reopens the same physical index across runs.
    pub fn open_or_create(
        &self,
        config: &EmbeddingConfig,
        dimensions: usize,
    ) -> Result<Arc<IndexStore>> {
        let mut stores = self.lock_stores();
        if let Some(store) = stores.get(config) {
            return Ok(Arc::clone(store));
        }

        let path = self.db_dir.join(config.index_file_name());
        let store = Arc::new(IndexStore::open(&path, config, dimensions)?);
        stores.insert(config.clone(), Arc::clone(&store));
        Ok(store)
    }

    /// The path the catalog would use for `config`, without opening anything.
    pub fn index_path(&self, config: &EmbeddingConfig) -> PathBuf {
        self.db_dir.join(config.index_file_name())
    }

    /// Number of currently open handles.
    pub fn open_count(&self) -> usize {
        self.lock_stores().len()
    }

    /// Drop all cached handles. Handles still referenced elsewhere (e.g. an
    /// active session) stay usable until their last `Arc` drops; the next
    /// `open_or_create` for a config reopens its file.
    pub fn close_all(&self) {
        self.lock_stores().clear();
    }

    fn lock_stores(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<EmbeddingConfig, Arc<IndexStore>>> {
        self.stores.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
