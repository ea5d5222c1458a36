//! Where the shell sends the user

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Surface {
    /// Login form
    Login,
    /// Main dashboard
    Shell,
}

pub trait Navigator: Send + Sync {
    fn redirect(&self, surface: Surface);
}

/// Logs redirects. Used by headless shells.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn redirect(&self, surface: Surface) {
        tracing::info!(surface = ?surface, "Redirect");
    }
}
