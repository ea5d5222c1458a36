//! Dashboard shell state container
//!
//! Built once when the shell comes up and dropped when the user navigates
//! away from it. Owns the session store and the tab manager and hands out
//! the login handler and route guard wired to them. Every redirect to the
//! login surface tears the tab set down, so nothing from one session is
//! left for the next.

use std::sync::Arc;

use realm_session::{
    ActivityKind, Clock, Navigator, Notifier, SessionStore, Surface, SystemClock,
    TracingNavigator, TracingNotifier,
};
use realm_storage::{keys, BrowserStorage};
use realm_tabs::{HeadlessSurface, PageSource, Tab, TabManager, TabSurface};

use crate::config::Config;
use crate::error::CoreError;
use crate::guard::AuthGuard;
use crate::login::LoginHandler;
use crate::Result;

/// The UI-facing pieces a dashboard talks to.
pub struct Collaborators {
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub surface: Arc<dyn TabSurface>,
    pub pages: Arc<dyn PageSource>,
    pub clock: Arc<dyn Clock>,
}

impl Collaborators {
    /// Log-only collaborators with pages from the configured source
    pub fn headless(config: &Config) -> Self {
        Self {
            notifier: Arc::new(TracingNotifier),
            navigator: Arc::new(TracingNavigator),
            surface: Arc::new(HeadlessSurface),
            pages: config.page_source(),
            clock: Arc::new(SystemClock),
        }
    }
}

/// Forwards redirects, dropping the tab set on the way to login.
struct ShellNavigator {
    tabs: TabManager,
    storage: BrowserStorage,
    inner: Arc<dyn Navigator>,
}

impl ShellNavigator {
    /// A login that landed after the redirect was scheduled
    fn logged_in_again(&self) -> bool {
        matches!(
            self.storage.session().get(keys::IS_LOGGED_IN),
            Ok(Some(flag)) if flag == "true"
        )
    }
}

impl Navigator for ShellNavigator {
    fn redirect(&self, surface: Surface) {
        if surface == Surface::Login {
            if self.logged_in_again() {
                tracing::debug!("Stale login redirect, keeping tabs");
            } else {
                self.tabs.reset();
            }
        }
        self.inner.redirect(surface);
    }
}

pub struct Dashboard {
    config: Config,
    session: SessionStore,
    tabs: TabManager,
    navigator: Arc<dyn Navigator>,
}

impl Dashboard {
    pub fn new(config: Config, storage: BrowserStorage, collaborators: Collaborators) -> Self {
        let tabs = TabManager::new(collaborators.surface, collaborators.pages);
        let navigator: Arc<dyn Navigator> = Arc::new(ShellNavigator {
            tabs: tabs.clone(),
            storage: storage.clone(),
            inner: collaborators.navigator,
        });

        let session = SessionStore::with_options(
            storage,
            collaborators.notifier,
            Arc::clone(&navigator),
            config.session,
            collaborators.clock,
        );

        Self {
            config,
            session,
            tabs,
            navigator,
        }
    }

    /// Headless dashboard with storage and pages taken from `config`
    pub fn open(config: Config) -> Result<Self> {
        let storage = config.open_storage()?;
        let collaborators = Collaborators::headless(&config);
        Ok(Self::new(config, storage, collaborators))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn tabs(&self) -> &TabManager {
        &self.tabs
    }

    pub fn login_handler(&self) -> LoginHandler {
        LoginHandler::new(self.session.clone(), Arc::clone(&self.navigator))
    }

    pub fn auth_guard(&self) -> AuthGuard {
        AuthGuard::new(self.session.clone(), Arc::clone(&self.navigator))
    }

    /// Bring the shell up with the configured home payload.
    pub fn start(&self) -> bool {
        self.start_with_home(self.config.load_home_payload())
    }

    /// Bring the shell up: adopt the current session (or bounce to login)
    /// and open the home tab.
    pub fn start_with_home(&self, home_payload: Option<String>) -> bool {
        if !self.session.resume() {
            tracing::info!("No valid session, shell not started");
            return false;
        }

        self.tabs.initialize(home_payload);

        tracing::info!(
            username = self.session.username().as_deref().unwrap_or_default(),
            "Dashboard started"
        );
        true
    }

    /// Open a page in a tab. Requires a live session; a dead one is logged
    /// out on the way.
    pub async fn navigate(&self, page_id: &str, title: &str) -> Result<String> {
        self.ensure_session()?;
        Ok(self.tabs.load_page(page_id, title).await)
    }

    /// Bring a tab to front. Requires a live session.
    pub fn activate_tab(&self, tab_id: &str) -> Result<bool> {
        self.ensure_session()?;
        Ok(self.tabs.set_active_tab(tab_id))
    }

    /// Close a tab. Requires a live session.
    pub fn close_tab(&self, tab_id: &str) -> Result<bool> {
        self.ensure_session()?;
        Ok(self.tabs.close_tab(tab_id))
    }

    /// Snapshot of the open tabs. Requires a live session.
    pub fn open_tabs(&self) -> Result<Vec<Tab>> {
        self.ensure_session()?;
        Ok(self.tabs.tabs())
    }

    fn ensure_session(&self) -> Result<()> {
        if self.session.check_session(false) {
            Ok(())
        } else {
            Err(CoreError::NotAuthenticated)
        }
    }

    pub fn record_activity(&self, kind: ActivityKind) {
        self.session.record_activity(kind);
    }

    /// Log out and drop the tabs right away rather than at the redirect.
    pub fn logout(&self) {
        self.session.logout();
        self.tabs.reset();
    }

    /// Stop background work; storage is left as is.
    pub fn shutdown(&self) {
        self.session.shutdown();
        tracing::debug!("Dashboard shut down");
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.shutdown();
    }
}
