//! User activity signals

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Pointer,
    Keyboard,
    Scroll,
    Touch,
}

impl ActivityKind {
    /// Map a DOM event name onto an activity kind.
    pub fn from_event(name: &str) -> Option<Self> {
        match name {
            "mousedown" | "mousemove" | "click" | "pointerdown" => Some(ActivityKind::Pointer),
            "keypress" | "keydown" => Some(ActivityKind::Keyboard),
            "scroll" | "wheel" => Some(ActivityKind::Scroll),
            "touchstart" | "touchmove" => Some(ActivityKind::Touch),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Pointer => "pointer",
            ActivityKind::Keyboard => "keyboard",
            ActivityKind::Scroll => "scroll",
            ActivityKind::Touch => "touch",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
