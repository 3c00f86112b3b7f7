//! Filesystem locations for punter state.

use std::path::PathBuf;

/// Application home directory: `~/.punter`.
#[must_use]
pub fn home_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".punter")
}

/// Default profile location: `~/.punter/profile.toml`.
#[must_use]
pub fn default_profile() -> PathBuf {
    home_dir().join("profile.toml")
}
