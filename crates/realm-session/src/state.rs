//! Session State Machine
//!
//! ```text
//! LoggedOut
//!   ↓ login
//! LoggedIn  ←─ activity ─┐
//!   ↓ warning timer      │
//! Warning ───────────────┘
//!   ↓ expiry timer
//! Expired
//!   ↓ logout
//! LoggedOut
//! ```
//!
//! Logout is reachable from every state.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session record
    LoggedOut,
    /// Valid session, more than the warning window left
    LoggedIn,
    /// Valid session inside the warning window
    Warning,
    /// Deadline reached, logout pending
    Expired,
}

impl SessionState {
    /// Check if transition to another state is valid
    pub fn can_transition_to(&self, target: SessionState) -> bool {
        match (self, target) {
            // Same state is always valid (no-op)
            (a, b) if *a == b => true,
            // Logout is always allowed
            (_, SessionState::LoggedOut) => true,
            (SessionState::LoggedOut, SessionState::LoggedIn) => true,
            (SessionState::LoggedIn, SessionState::Warning) => true,
            // Validator can find an expired session before the warning fired
            (SessionState::LoggedIn, SessionState::Expired) => true,
            // Activity during the warning window
            (SessionState::Warning, SessionState::LoggedIn) => true,
            (SessionState::Warning, SessionState::Expired) => true,
            _ => false,
        }
    }

    /// Returns true while a session is usable
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::LoggedIn | SessionState::Warning)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::LoggedOut => "logged_out",
            SessionState::LoggedIn => "logged_in",
            SessionState::Warning => "warning",
            SessionState::Expired => "expired",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
