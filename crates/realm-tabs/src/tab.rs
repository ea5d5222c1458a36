//! Tab data structure
//!
//! The selector shows a truncated title; identity is the page id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::TabState;

/// Longest title shown on a tab selector, ellipsis included.
pub const MAX_TITLE_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tab {
    /// Page id, unique within a manager
    pub id: String,
    /// Full title
    pub title: String,
    /// HTML fragment rendered in the pane
    pub content: String,
    /// Set when the content is an error placeholder
    pub load_error: Option<String>,
    pub state: TabState,
    pub opened_at: DateTime<Utc>,
    /// Last time the tab was brought to front
    pub last_accessed_at: DateTime<Utc>,
}

impl Tab {
    pub fn new(page_id: String, title: String, content: String) -> Self {
        let now = Utc::now();

        Self {
            id: page_id,
            title,
            content,
            load_error: None,
            state: TabState::Background,
            opened_at: now,
            last_accessed_at: now,
        }
    }

    /// Tab whose pane explains why the page could not be loaded
    pub fn failed(page_id: String, title: String, message: String) -> Self {
        let content = crate::content::error_page(&title, &message);
        let mut tab = Self::new(page_id, title, content);
        tab.load_error = Some(message);
        tab
    }

    pub fn is_active(&self) -> bool {
        self.state == TabState::Active
    }

    pub fn is_error(&self) -> bool {
        self.load_error.is_some()
    }

    pub(crate) fn activate(&mut self) {
        if self.state != TabState::Active {
            tracing::trace!(tab_id = %self.id, "Tab activated");
            self.state = TabState::Active;
        }
        self.last_accessed_at = Utc::now();
    }

    pub(crate) fn blur(&mut self) {
        self.state = TabState::Background;
    }

    /// Title as shown on the selector
    pub fn display_title(&self) -> String {
        truncate_title(&self.title, MAX_TITLE_LEN)
    }
}

/// Shorten `title` to at most `max_len` characters, ending in `...` when cut.
pub fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        return title.to_string();
    }

    let keep = max_len.saturating_sub(3);
    let mut short: String = title.chars().take(keep).collect();
    short.push_str("...");
    short
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tab_starts_in_background() {
        let tab = Tab::new("home".to_string(), "Home".to_string(), "<p>hi</p>".to_string());
        assert_eq!(tab.state, TabState::Background);
        assert!(!tab.is_error());
    }

    #[test]
    fn test_truncate_title() {
        assert_eq!(truncate_title("Home", MAX_TITLE_LEN), "Home");
        assert_eq!(
            truncate_title("Exactly twenty chars", MAX_TITLE_LEN),
            "Exactly twenty chars"
        );
        assert_eq!(
            truncate_title("Customer Account Statements", MAX_TITLE_LEN),
            "Customer Account ..."
        );
        assert_eq!(
            truncate_title("Customer Account Statements", MAX_TITLE_LEN).chars().count(),
            MAX_TITLE_LEN
        );
    }

    #[test]
    fn test_truncate_counts_characters_not_bytes() {
        let title = "Überweisungsaufträge für Firmenkunden";
        let short = truncate_title(title, MAX_TITLE_LEN);
        assert_eq!(short.chars().count(), MAX_TITLE_LEN);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn test_display_title_keeps_identity() {
        let tab = Tab::new(
            "loan-applications".to_string(),
            "Loan Applications Pending Review".to_string(),
            String::new(),
        );
        assert_eq!(tab.display_title(), "Loan Applications...");
        assert_eq!(tab.id, "loan-applications");
        assert_eq!(tab.title, "Loan Applications Pending Review");
    }

    #[test]
    fn test_failed_tab_carries_message() {
        let tab = Tab::failed(
            "missing".to_string(),
            "Missing".to_string(),
            "Page not found: missing".to_string(),
        );
        assert!(tab.is_error());
        assert!(tab.content.contains("Page not found: missing"));
    }
}
