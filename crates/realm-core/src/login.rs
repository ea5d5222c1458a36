//! Login form handling

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use realm_session::{Navigator, SessionStore, Surface};
use realm_storage::keys;

use crate::error::LoginError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub remember_me: bool,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            remember_me: false,
        }
    }

    pub fn remember(mut self) -> Self {
        self.remember_me = true;
        self
    }
}

pub struct LoginHandler {
    session: SessionStore,
    navigator: Arc<dyn Navigator>,
}

impl LoginHandler {
    pub fn new(session: SessionStore, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    /// Validate the form, log in, store or forget the remembered user, and
    /// move on to the shell.
    pub fn submit(&self, form: &LoginForm) -> Result<(), LoginError> {
        if form.username.is_empty() || form.password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }

        if !self.session.login(&form.username, &form.password) {
            return Err(LoginError::InvalidCredentials);
        }

        self.store_remember_me(form);
        self.navigator.redirect(Surface::Shell);
        Ok(())
    }

    fn store_remember_me(&self, form: &LoginForm) {
        let durable = self.session.storage().durable();

        let result = if form.remember_me {
            durable
                .set(keys::REMEMBER_ME, "true")
                .and_then(|_| durable.set(keys::USERNAME, &form.username))
        } else {
            durable
                .remove(keys::REMEMBER_ME)
                .and_then(|_| durable.remove(keys::USERNAME))
        };

        // Convenience only; the login itself already succeeded
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to update remembered user");
        }
    }

    pub fn remembered_username(&self) -> Option<String> {
        let durable = self.session.storage().durable();

        match durable.get(keys::REMEMBER_ME) {
            Ok(Some(flag)) if flag == "true" => durable.get(keys::USERNAME).ok().flatten(),
            _ => None,
        }
    }

    /// Blank form, pre-filled with the remembered user if there is one
    pub fn prefill(&self) -> LoginForm {
        match self.remembered_username() {
            Some(username) => LoginForm::new(username, "").remember(),
            None => LoginForm::default(),
        }
    }
}
