//! Tab error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Tab not found: {0}")]
    NotFound(String),
}

/// Why a page could not be fetched. Never escapes `TabManager::load_page`;
/// it ends up as the message of an error tab.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("Invalid page id: {0:?}")]
    InvalidId(String),

    #[error("HTTP {status} while fetching page {page_id}")]
    Http { page_id: String, status: u16 },

    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
