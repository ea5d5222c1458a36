//! Tab visibility
//!
//! ```text
//! Active ⇄ Background
//! ```
//!
//! Exactly one tab in a manager is `Active` at a time.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabState {
    /// Selector highlighted, pane visible
    Active,
    /// Rendered but hidden
    Background,
}

impl TabState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TabState::Active => "active",
            TabState::Background => "background",
        }
    }
}

impl std::fmt::Display for TabState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
