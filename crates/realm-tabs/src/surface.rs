//! Rendering surface for tabs
//!
//! The manager owns tab state; a surface owns whatever draws it. Methods
//! are called with the tab collection locked, so implementations must not
//! call back into the manager.

use crate::tab::Tab;

pub trait TabSurface: Send + Sync {
    /// Draw the selector and the (hidden) content pane of a new tab
    fn render_tab(&self, tab: &Tab);
    /// Drop the selector and pane of a closed tab
    fn remove_tab(&self, tab_id: &str);
    /// Highlight this tab and show its pane, hiding every other one
    fn show_active(&self, tab_id: &str);
    fn scroll_into_view(&self, tab_id: &str);
}

/// Surface with nothing to draw on. Logs what it would have done.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessSurface;

impl TabSurface for HeadlessSurface {
    fn render_tab(&self, tab: &Tab) {
        tracing::debug!(
            tab_id = %tab.id,
            title = %tab.display_title(),
            bytes = tab.content.len(),
            "Render tab"
        );
    }

    fn remove_tab(&self, tab_id: &str) {
        tracing::debug!(tab_id = %tab_id, "Remove tab");
    }

    fn show_active(&self, tab_id: &str) {
        tracing::debug!(tab_id = %tab_id, "Show tab");
    }

    fn scroll_into_view(&self, _tab_id: &str) {}
}
