//! Demo credentials
//!
//! A single hard-coded pair. This is a sample dashboard, not an identity
//! provider; the pair is intentionally not configurable.

pub const DEFAULT_USERNAME: &str = "admin";
pub const DEFAULT_PASSWORD: &str = "admin";

pub(crate) fn verify(username: &str, password: &str) -> bool {
    username == DEFAULT_USERNAME && password == DEFAULT_PASSWORD
}
