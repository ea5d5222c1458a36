//! Route guard for the login and shell surfaces

use std::sync::Arc;

use realm_session::{Navigator, SessionStore, Surface};
use realm_storage::keys;

pub struct AuthGuard {
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl AuthGuard {
    pub fn new(session: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    /// Any trace of a login in the session area, valid or not.
    pub fn has_session_info(&self) -> bool {
        let area = self.session.storage().session();
        let present = |key: &str| matches!(area.get(key), Ok(Some(_)));

        matches!(area.get(keys::IS_LOGGED_IN), Ok(Some(flag)) if flag == "true")
            || present(keys::SESSION_DATA)
            || present(keys::USERNAME)
    }

    pub fn is_authenticated(&self) -> bool {
        self.has_session_info() && self.session.is_logged_in()
    }

    /// Send unauthenticated users to login. On the login surface itself
    /// nothing happens unless `force` is set.
    pub fn require_auth(&self, current: Surface, force: bool) -> bool {
        if self.is_authenticated() {
            return true;
        }

        if current != Surface::Login || force {
            tracing::info!("Not authenticated, redirecting to login");
            self.navigator.redirect(Surface::Login);
        }
        false
    }

    /// Skip the login form for users who are already in.
    pub fn redirect_if_authenticated(&self, current: Surface) -> bool {
        if !self.is_authenticated() {
            return false;
        }

        if current == Surface::Login {
            self.navigator.redirect(Surface::Shell);
        }
        true
    }
}
