//! Canonical file paths for add-on data files.
//!
//! Both files live in the per-user data directory:
//!   - config.toml  Edited by the user, read (and watched) by the add-on.
//!   - status.toml  Written by the add-on, read by overlays and tooling.
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "SaneSkies";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const STATUS_FILE_NAME: &str = "status.toml";

/// Returns the add-on data directory, e.g. `~/.local/share/SaneSkies` on Linux.
pub fn app_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.data_dir().to_path_buf())
        .context("Could not determine a home directory for add-on data")
}

pub fn config_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}

pub fn status_file_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STATUS_FILE_NAME)
}
