//! Bankers Realm Tab Management
//!
//! The dashboard shows one content pane per open page. Tabs are keyed by page
//! id, so opening a page twice focuses the existing tab. The `home` tab is
//! created at startup and the collection never drops below one tab.

pub mod content;
mod error;
mod manager;
mod page;
mod state;
mod surface;
mod tab;

pub use error::{PageError, TabError};
pub use manager::{TabManager, HOME_TAB_ID};
pub use page::{DirPageSource, HttpPageSource, PageSource, StaticPageSource};
pub use state::TabState;
pub use surface::{HeadlessSurface, TabSurface};
pub use tab::{truncate_title, Tab, MAX_TITLE_LEN};

pub type Result<T> = std::result::Result<T, TabError>;
