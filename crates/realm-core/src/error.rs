//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] realm_storage::StorageError),

    #[error("Tab error: {0}")]
    Tab(#[from] realm_tabs::TabError),

    #[error("Session error: {0}")]
    Session(#[from] realm_session::SessionError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not logged in")]
    NotAuthenticated,
}

/// Login form outcomes shown to the user verbatim.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    #[error("Please enter both username and password")]
    MissingCredentials,

    #[error("Invalid username or password. Default credentials: admin/admin")]
    InvalidCredentials,
}
