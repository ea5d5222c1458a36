//! Dashboard configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use url::Url;

use realm_session::SessionTimings;
use realm_storage::{BrowserStorage, Database, MemoryStorage};
use realm_tabs::{DirPageSource, HttpPageSource, PageSource};

use crate::error::CoreError;
use crate::Result;

/// Environment variable naming a JSON config file
pub const CONFIG_ENV: &str = "REALM_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite file for the durable storage area; in memory when unset
    pub durable_storage_path: Option<PathBuf>,
    /// Directory holding `<page_id>.html` files
    pub pages_dir: PathBuf,
    /// Fetch pages over HTTP from here instead of `pages_dir`
    pub pages_base_url: Option<Url>,
    /// Dashboard fragment shown in the home tab
    pub home_payload_path: Option<PathBuf>,
    /// Session lifetime and timer settings
    pub session: SessionTimings,
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            durable_storage_path: Some(data_dir.join("realm.db")),
            pages_dir: PathBuf::from("pages"),
            pages_base_url: None,
            home_payload_path: None,
            session: SessionTimings::default(),
        }
    }

    /// Nothing on disk: both storage areas in memory.
    pub fn ephemeral() -> Self {
        Self {
            durable_storage_path: None,
            ..Self::new(PathBuf::new())
        }
    }

    pub fn data_dir() -> PathBuf {
        dirs::data_local_dir()
            .map(|d| d.join("BankersRealm"))
            .unwrap_or_else(|| PathBuf::from(".realm"))
    }

    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("{}: {e}", path.display())))?;
        let config = serde_json::from_str(&raw)?;

        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Config from `$REALM_CONFIG` when set, defaults otherwise.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    pub fn open_storage(&self) -> Result<BrowserStorage> {
        let session = Arc::new(MemoryStorage::new());

        let storage = match &self.durable_storage_path {
            Some(path) => BrowserStorage::new(session, Arc::new(Database::open(path)?)),
            None => BrowserStorage::new(session, Arc::new(MemoryStorage::new())),
        };

        Ok(storage)
    }

    pub fn page_source(&self) -> Arc<dyn PageSource> {
        match &self.pages_base_url {
            Some(base) => Arc::new(HttpPageSource::new(base.clone())),
            None => Arc::new(DirPageSource::new(self.pages_dir.clone())),
        }
    }

    /// Home tab payload, if configured and readable.
    pub fn load_home_payload(&self) -> Option<String> {
        let path = self.home_payload_path.as_ref()?;
        match std::fs::read_to_string(path) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Home payload unavailable");
                None
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}

// Simple dirs implementation for the local data directory
mod dirs {
    use std::path::PathBuf;

    pub fn data_local_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("LOCALAPPDATA").ok().map(PathBuf::from)
        }
        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join("Library/Application Support"))
        }
        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_DATA_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var("HOME")
                        .ok()
                        .map(|h| PathBuf::from(h).join(".local/share"))
                })
        }
        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }
}
