//! Bankers Realm Core
//!
//! Composition layer for the dashboard shell. Services are built once per
//! shell by [`Dashboard`] and handed to whatever UI drives them; nothing
//! here is a global.

mod config;
mod dashboard;
mod error;
mod guard;
mod login;

pub use config::Config;
pub use dashboard::{Collaborators, Dashboard};
pub use error::{CoreError, LoginError};
pub use guard::AuthGuard;
pub use login::{LoginForm, LoginHandler};

// Re-export core components
pub use realm_session::{
    ActivityKind, Clock, MonotonicClock, Navigator, Notice, NoticeBoard, Notifier, Session,
    SessionError, SessionState, SessionStore, SessionTimings, Severity, Surface, SystemClock,
    TracingNavigator, TracingNotifier,
};
pub use realm_storage::{keys, BrowserStorage, Database, MemoryStorage, StorageArea, StorageError};
pub use realm_tabs::{
    DirPageSource, HeadlessSurface, HttpPageSource, PageError, PageSource, StaticPageSource, Tab,
    TabError, TabManager, TabState, TabSurface,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
