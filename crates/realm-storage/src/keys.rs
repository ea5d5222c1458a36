//! Persisted key names shared by the session store and the login surface.

/// Serialized session record (session area).
pub const SESSION_DATA: &str = "sessionData";
/// `"true"` while logged in (session area).
pub const IS_LOGGED_IN: &str = "isLoggedIn";
/// Logged-in user in the session area, remembered user in the durable area.
pub const USERNAME: &str = "username";
/// Login-form "remember me" flag (durable area).
pub const REMEMBER_ME: &str = "rememberMe";
/// Sidebar collapse state (durable area).
pub const MENU_COLLAPSED: &str = "menuCollapsed";
/// Windows-style menu visibility (durable area).
pub const WINDOWS_MENU_VISIBLE: &str = "windowsMenuVisible";
