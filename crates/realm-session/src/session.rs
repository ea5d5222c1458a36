//! Session record
//!
//! Stored whole under `sessionData`; every change rewrites the record.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub username: String,
    /// Epoch milliseconds
    pub login_time: i64,
    /// Epoch milliseconds
    pub expiry_time: i64,
    pub is_active: bool,
}

impl Session {
    pub fn new(username: String, now_ms: i64, lifetime_ms: i64) -> Self {
        Self {
            username,
            login_time: now_ms,
            expiry_time: now_ms.saturating_add(lifetime_ms.max(1)),
            is_active: true,
        }
    }

    pub fn is_valid_at(&self, now_ms: i64) -> bool {
        self.is_active && now_ms < self.expiry_time
    }

    /// Copy with a deadline `lifetime_ms` from now, never earlier than or
    /// equal to the current one.
    pub fn extended(&self, now_ms: i64, lifetime_ms: i64) -> Self {
        Self {
            expiry_time: now_ms
                .saturating_add(lifetime_ms)
                .max(self.expiry_time.saturating_add(1)),
            ..self.clone()
        }
    }

    /// Whole minutes left, floored, never negative
    pub fn remaining_minutes(&self, now_ms: i64) -> i64 {
        (self.expiry_time.saturating_sub(now_ms) / 60_000).max(0)
    }
}
