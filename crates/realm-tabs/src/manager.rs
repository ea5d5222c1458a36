//! Tab Manager
//!
//! Ordered tab collection with exactly one active tab. All mutations happen
//! under a single write lock, so the invariants hold between any two calls.

use parking_lot::RwLock;
use std::sync::Arc;

use crate::content;
use crate::error::TabError;
use crate::page::PageSource;
use crate::surface::TabSurface;
use crate::tab::Tab;
use crate::Result;

pub const HOME_TAB_ID: &str = "home";
const HOME_TAB_TITLE: &str = "Home";

#[derive(Debug, Default)]
struct TabSet {
    /// Insertion order
    tabs: Vec<Tab>,
    active: Option<String>,
}

impl TabSet {
    fn position(&self, tab_id: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.id == tab_id)
    }

    fn activate(&mut self, tab_id: &str, surface: &dyn TabSurface) -> bool {
        if self.position(tab_id).is_none() {
            return false;
        }

        for tab in self.tabs.iter_mut() {
            if tab.id == tab_id {
                tab.activate();
            } else {
                tab.blur();
            }
        }
        self.active = Some(tab_id.to_string());

        surface.show_active(tab_id);
        surface.scroll_into_view(tab_id);
        true
    }
}

pub struct TabManager {
    tabs: Arc<RwLock<TabSet>>,
    surface: Arc<dyn TabSurface>,
    pages: Arc<dyn PageSource>,
}

impl TabManager {
    pub fn new(surface: Arc<dyn TabSurface>, pages: Arc<dyn PageSource>) -> Self {
        Self {
            tabs: Arc::new(RwLock::new(TabSet::default())),
            surface,
            pages,
        }
    }

    /// Open the home tab from the embedded dashboard payload, or a welcome
    /// placeholder when there is none.
    pub fn initialize(&self, home_payload: Option<String>) -> String {
        let content = home_payload.unwrap_or_else(|| {
            tracing::warn!("No home payload, using welcome placeholder");
            content::welcome_page()
        });

        let id = self.create_tab(HOME_TAB_ID, HOME_TAB_TITLE, content);
        tracing::info!(tab_count = self.len(), "Tabs initialized");
        id
    }

    /// Open a tab for `page_id`, or bring the existing one to front. The
    /// content of an existing tab is left untouched.
    pub fn create_tab(&self, page_id: &str, title: &str, content: String) -> String {
        self.open(Tab::new(page_id.to_string(), title.to_string(), content))
    }

    fn open(&self, tab: Tab) -> String {
        let mut set = self.tabs.write();
        let id = tab.id.clone();

        if set.position(&id).is_some() {
            set.activate(&id, self.surface.as_ref());
            return id;
        }

        self.surface.render_tab(&tab);
        tracing::info!(tab_id = %id, title = %tab.title, error = tab.is_error(), "Opened tab");
        set.tabs.push(tab);
        set.activate(&id, self.surface.as_ref());

        id
    }

    /// Bring a tab to front. Unknown ids are ignored.
    pub fn set_active_tab(&self, tab_id: &str) -> bool {
        self.tabs.write().activate(tab_id, self.surface.as_ref())
    }

    /// Close a tab. Unknown ids and the last remaining tab are ignored. When
    /// the active tab closes, the last tab left in order takes over.
    pub fn close_tab(&self, tab_id: &str) -> bool {
        let mut set = self.tabs.write();

        let Some(index) = set.position(tab_id) else {
            return false;
        };

        if set.tabs.len() <= 1 {
            tracing::debug!(tab_id = %tab_id, "Refusing to close the last tab");
            return false;
        }

        let removed = set.tabs.remove(index);
        self.surface.remove_tab(&removed.id);

        if set.active.as_deref() == Some(tab_id) {
            set.active = None;
            if let Some(next) = set.tabs.last().map(|t| t.id.clone()) {
                set.activate(&next, self.surface.as_ref());
            }
        }

        tracing::info!(tab_id = %tab_id, "Closed tab");
        true
    }

    /// Open a page in a tab, fetching its content first. Fetch failures turn
    /// into an error tab; this never fails.
    pub async fn load_page(&self, page_id: &str, title: &str) -> String {
        if self.set_active_tab(page_id) {
            return page_id.to_string();
        }

        let tab = match self.pages.fetch(page_id).await {
            Ok(content) => Tab::new(page_id.to_string(), title.to_string(), content),
            Err(e) => {
                tracing::warn!(page_id = %page_id, error = %e, "Failed to load page");
                Tab::failed(page_id.to_string(), title.to_string(), e.to_string())
            }
        };

        self.open(tab)
    }

    /// Drop every tab and its rendered artifacts. Used when the shell is
    /// torn down; `initialize` brings it back.
    pub fn reset(&self) -> usize {
        let mut set = self.tabs.write();
        let removed = std::mem::take(&mut *set);

        for tab in &removed.tabs {
            self.surface.remove_tab(&tab.id);
        }

        if !removed.tabs.is_empty() {
            tracing::info!(tab_count = removed.tabs.len(), "Tabs reset");
        }
        removed.tabs.len()
    }

    pub fn get_tab(&self, tab_id: &str) -> Result<Tab> {
        self.tabs
            .read()
            .tabs
            .iter()
            .find(|t| t.id == tab_id)
            .cloned()
            .ok_or_else(|| TabError::NotFound(tab_id.to_string()))
    }

    /// All tabs in order
    pub fn tabs(&self) -> Vec<Tab> {
        self.tabs.read().tabs.clone()
    }

    pub fn active_tab_id(&self) -> Option<String> {
        self.tabs.read().active.clone()
    }

    pub fn active_tab(&self) -> Option<Tab> {
        let set = self.tabs.read();
        let active = set.active.as_deref()?;
        set.tabs.iter().find(|t| t.id == active).cloned()
    }

    pub fn contains(&self, tab_id: &str) -> bool {
        self.tabs.read().position(tab_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.tabs.read().tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.read().tabs.is_empty()
    }
}

impl Clone for TabManager {
    fn clone(&self) -> Self {
        Self {
            tabs: Arc::clone(&self.tabs),
            surface: Arc::clone(&self.surface),
            pages: Arc::clone(&self.pages),
        }
    }
}
