//! Storage area contract and the session/durable pair

use serde::Serialize;
use std::sync::Arc;

use crate::memory::MemoryStorage;
use crate::Result;

/// A string key/value store.
pub trait StorageArea: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

/// Keys currently present in each area.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StorageKeys {
    pub session: Vec<String>,
    pub durable: Vec<String>,
}

impl StorageKeys {
    pub fn is_empty(&self) -> bool {
        self.session.is_empty() && self.durable.is_empty()
    }
}

/// The two storage areas a dashboard shell sees.
#[derive(Clone)]
pub struct BrowserStorage {
    session: Arc<dyn StorageArea>,
    durable: Arc<dyn StorageArea>,
}

impl BrowserStorage {
    pub fn new(session: Arc<dyn StorageArea>, durable: Arc<dyn StorageArea>) -> Self {
        Self { session, durable }
    }

    /// Both areas in memory. Used by tests and by shells without a data dir.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemoryStorage::new()),
            Arc::new(MemoryStorage::new()),
        )
    }

    pub fn session(&self) -> &dyn StorageArea {
        self.session.as_ref()
    }

    pub fn durable(&self) -> &dyn StorageArea {
        self.durable.as_ref()
    }

    /// Wipe both areas. Keeps going past a failing area so the other one is
    /// still cleared; returns `false` if anything failed.
    pub fn clear_all(&self) -> bool {
        let mut ok = true;

        if let Err(e) = self.session.clear() {
            tracing::error!(error = %e, "Failed to clear session storage");
            ok = false;
        }
        if let Err(e) = self.durable.clear() {
            tracing::error!(error = %e, "Failed to clear durable storage");
            ok = false;
        }

        ok
    }

    /// Remove the given keys from both areas.
    pub fn clear_specific(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.session.remove(key)?;
            self.durable.remove(key)?;
        }
        Ok(())
    }

    pub fn all_keys(&self) -> Result<StorageKeys> {
        Ok(StorageKeys {
            session: self.session.keys()?,
            durable: self.durable.keys()?,
        })
    }
}

impl std::fmt::Debug for BrowserStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserStorage").finish_non_exhaustive()
    }
}
