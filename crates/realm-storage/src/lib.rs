//! Bankers Realm Storage Layer
//!
//! Two storage areas back the dashboard:
//! - a session-scoped area that lives as long as the shell process
//! - a durable area persisted in SQLite
//!
//! Both speak the same string key/value contract so the session and login
//! code never care which one they are writing to.

mod area;
mod database;
mod error;
pub mod keys;
mod memory;
mod migrations;

pub use area::{BrowserStorage, StorageArea, StorageKeys};
pub use database::Database;
pub use error::StorageError;
pub use memory::MemoryStorage;

pub type Result<T> = std::result::Result<T, StorageError>;
