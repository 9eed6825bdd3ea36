use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::banner::BannerState;
use crate::session::SessionFlags;

/// Runtime status written to `<data dir>/status.toml`.
/// Overlay and tooling read this file (read-only) to follow the session.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AddonStatus {
    /// Add-on version (set from Cargo.toml at compile time).
    pub version: String,
    /// Current banner lifecycle state.
    pub banner: BannerState,
    /// Id of the drop currently on screen, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_drop: Option<String>,
    /// RFC 3339 timestamp of the most recently accepted drop, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_drop_timestamp: Option<String>,
    /// Why the most recent drop was refused, cleared by the next accepted one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Session flags as of the last tick.
    pub session: SessionFlags,
}

impl AddonStatus {
    /// Constructs the initial idle status on startup.
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            banner: BannerState::Idle,
            active_drop: None,
            last_drop_timestamp: None,
            error: None,
            session: SessionFlags::default(),
        }
    }
}

impl Default for AddonStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes `status` to TOML and writes it to `path`.
/// Creates the parent directory if it does not exist.
/// A failed write is logged and otherwise ignored.
pub fn write_status(path: &Path, status: &AddonStatus) {
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!(target: "status", "Failed to create directory {}: {e}", parent.display());
            return;
        }
    }
    match toml::to_string_pretty(status) {
        Ok(content) => {
            if let Err(e) = std::fs::write(path, content) {
                tracing::warn!(target: "status", "Failed to write status file: {e}");
            }
        }
        Err(e) => tracing::warn!(target: "status", "Failed to serialize status: {e}"),
    }
}
