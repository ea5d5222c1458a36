//! Session timing knobs

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionTimings {
    /// Lifetime granted by login and by each activity extension
    #[serde(with = "duration_ms")]
    pub duration: Duration,
    /// How long before expiry the warning notice fires
    #[serde(with = "duration_ms")]
    pub warning: Duration,
    /// Period of the background validator
    #[serde(with = "duration_ms")]
    pub check_interval: Duration,
    /// Quiet period that coalesces bursts of activity
    #[serde(with = "duration_ms")]
    pub activity_debounce: Duration,
    /// Delay between the logout notice and the redirect to login
    #[serde(with = "duration_ms")]
    pub logout_redirect_delay: Duration,
}

impl Default for SessionTimings {
    fn default() -> Self {
        Self {
            duration: Duration::from_secs(30 * 60),
            warning: Duration::from_secs(5 * 60),
            check_interval: Duration::from_secs(60),
            activity_debounce: Duration::from_secs(1),
            logout_redirect_delay: Duration::from_millis(500),
        }
    }
}

pub(crate) fn as_ms(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

mod duration_ms {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
