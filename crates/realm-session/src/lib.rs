//! Bankers Realm Session Management
//!
//! One login session per shell, kept in the session-scoped storage area:
//! - fixed demo credentials, checked on login
//! - 30 minute lifetime, refreshed by user activity
//! - warning notice 5 minutes before expiry, forced logout at expiry
//! - logout wipes every storage area and sends the user back to login

mod activity;
mod clock;
mod credentials;
mod error;
mod navigator;
mod notice;
mod session;
mod state;
mod store;
mod timings;

pub use activity::ActivityKind;
pub use clock::{Clock, MonotonicClock, SystemClock};
pub use credentials::{DEFAULT_PASSWORD, DEFAULT_USERNAME};
pub use error::SessionError;
pub use navigator::{Navigator, Surface, TracingNavigator};
pub use notice::{Notice, NoticeBoard, Notifier, Severity, TracingNotifier};
pub use session::Session;
pub use state::SessionState;
pub use store::{PendingTimers, SessionStore};
pub use timings::SessionTimings;

pub type Result<T> = std::result::Result<T, SessionError>;
