//! Transient user-visible notices

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    /// Heading shown above the message
    pub fn title(&self) -> &'static str {
        match self {
            Severity::Info => "Information",
            Severity::Success => "Success",
            Severity::Warning => "Session Warning",
            Severity::Error => "Session Expired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub id: Uuid,
    pub message: String,
    pub severity: Severity,
    /// Zero means the notice stays until replaced
    pub duration: Duration,
}

impl Notice {
    pub fn new(message: impl Into<String>, severity: Severity, duration: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
            duration,
        }
    }

    pub fn title(&self) -> &'static str {
        self.severity.title()
    }
}

/// Receives notices. Nothing is returned to the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.severity {
            Severity::Error => tracing::error!(title = notice.title(), "{}", notice.message),
            Severity::Warning => tracing::warn!(title = notice.title(), "{}", notice.message),
            Severity::Info | Severity::Success => {
                tracing::info!(title = notice.title(), "{}", notice.message)
            }
        }
    }
}

/// Single-slot notice display.
///
/// A new notice replaces whatever is showing. Each notice removes itself
/// once its duration has elapsed, unless it was replaced first.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Arc<RwLock<Option<Notice>>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<Notice> {
        self.current.read().clone()
    }

    pub fn dismiss(&self) {
        self.current.write().take();
    }
}

impl Notifier for NoticeBoard {
    fn notify(&self, notice: Notice) {
        let id = notice.id;
        let duration = notice.duration;

        TracingNotifier.notify(notice.clone());
        *self.current.write() = Some(notice);

        if duration.is_zero() {
            return;
        }

        let current = Arc::clone(&self.current);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(duration).await;
                    let mut slot = current.write();
                    if slot.as_ref().map(|n| n.id) == Some(id) {
                        slot.take();
                    }
                });
            }
            Err(_) => tracing::debug!(notice_id = %id, "No runtime, notice stays until replaced"),
        }
    }
}

impl Clone for NoticeBoard {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
        }
    }
}
