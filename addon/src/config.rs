use anyhow::{Context, Result};
use notify::{Config as NotifyConfig, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

use crate::event::AddonEvent;

pub const DEFAULT_NETWORK_SUFFIX: &str = ".hypixel.net";
pub const DEFAULT_GAME_MODE_MARKER: &str = "§lSKYBLOCK";
pub const MIN_VISIBILITY_MILLIS: u64 = 500;
pub const MAX_VISIBILITY_MILLIS: u64 = 30_000;
pub const DEFAULT_VISIBILITY_MILLIS: u64 = 3_000;
pub const DEFAULT_JINGLE_SOUND: &str = "partlysaneskies:rngdropjingle";

/// Root configuration structure. Deserialized from `<data dir>/config.toml`.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub detection: DetectionConfig,
    #[serde(default)]
    pub banner: BannerConfig,
    #[serde(default)]
    pub debug_drop: DebugDropConfig,
}

/// Rules the session tracker uses to classify the current connection.
#[derive(Debug, Deserialize, Clone)]
pub struct DetectionConfig {
    /// Domain suffix identifying the target network (e.g. ".hypixel.net").
    #[serde(default = "default_network_suffix")]
    pub network_suffix: String,
    /// Scoreboard marker identifying the target game mode, including its
    /// `§` style codes.
    #[serde(default = "default_game_mode_marker")]
    pub game_mode_marker: String,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            network_suffix: DEFAULT_NETWORK_SUFFIX.to_string(),
            game_mode_marker: DEFAULT_GAME_MODE_MARKER.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BannerConfig {
    /// How long a drop banner stays visible. Clamped to [500, 30000] ms.
    #[serde(default = "default_visibility_millis")]
    pub visibility_millis: u64,
    /// Whether a sound cue accompanies an accepted drop.
    #[serde(default = "default_play_jingle")]
    pub play_jingle: bool,
    /// Resource name of the sound cue handed to the host.
    #[serde(default = "default_jingle_sound")]
    pub jingle_sound: String,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            visibility_millis: DEFAULT_VISIBILITY_MILLIS,
            play_jingle: true,
            jingle_sound: DEFAULT_JINGLE_SOUND.to_string(),
        }
    }
}

impl BannerConfig {
    /// Returns the visibility duration clamped to the supported range.
    pub fn effective_visibility_millis(&self) -> u64 {
        self.visibility_millis
            .clamp(MIN_VISIBILITY_MILLIS, MAX_VISIBILITY_MILLIS)
    }
}

/// Sample drop fired by the debug action.
#[derive(Debug, Deserialize, Clone)]
pub struct DebugDropConfig {
    #[serde(default = "default_drop_id")]
    pub id: String,
    #[serde(default = "default_drop_headline")]
    pub headline: String,
    #[serde(default = "default_drop_tier")]
    pub tier: u32,
    #[serde(default = "default_drop_quantity")]
    pub quantity: u32,
    #[serde(default = "default_primary_color")]
    pub primary_color: u32,
    #[serde(default = "default_secondary_color")]
    pub secondary_color: u32,
}

impl Default for DebugDropConfig {
    fn default() -> Self {
        Self {
            id: default_drop_id(),
            headline: default_drop_headline(),
            tier: default_drop_tier(),
            quantity: default_drop_quantity(),
            primary_color: default_primary_color(),
            secondary_color: default_secondary_color(),
        }
    }
}

/// Loads the config file at `path`, returning `Config::default()` if the file does not exist.
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_or_default(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Spawns a file watcher on the parent directory of `path`.  Whenever the config
/// file is created or modified, reloads it and sends a `ConfigReloaded` event.
pub async fn watch_config(path: PathBuf, tx: mpsc::Sender<AddonEvent>) {
    let (watch_tx, mut watch_rx) = mpsc::channel::<notify::Event>(16);

    let mut watcher = match RecommendedWatcher::new(
        move |res: notify::Result<notify::Event>| {
            if let Ok(event) = res {
                let _ = watch_tx.blocking_send(event);
            }
        },
        NotifyConfig::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            tracing::warn!(target: "config", "Failed to create file watcher: {e}");
            return;
        }
    };

    // Watch the parent directory rather than the file directly so we catch
    // editor-style atomic saves (write-new + rename).
    let watch_dir = match path.parent() {
        Some(d) => d.to_path_buf(),
        None => {
            tracing::warn!(target: "config", "Config path has no parent directory");
            return;
        }
    };

    if let Err(e) = watcher.watch(&watch_dir, RecursiveMode::NonRecursive) {
        tracing::warn!(target: "config", "Failed to watch config directory: {e}");
        return;
    }

    while let Some(event) = watch_rx.recv().await {
        let affects_config = event.paths.iter().any(|p| p == path.as_path());
        let is_write = matches!(
            event.kind,
            notify::EventKind::Create(_) | notify::EventKind::Modify(_)
        );

        if affects_config && is_write {
            match load_or_default(&path) {
                Ok(config) => {
                    if tx.send(AddonEvent::ConfigReloaded(config)).await.is_err() {
                        break;
                    }
                }
                Err(e) => tracing::warn!(target: "config", "Failed to reload config: {e:#}"),
            }
        }
    }
}

fn default_network_suffix() -> String {
    DEFAULT_NETWORK_SUFFIX.to_string()
}

fn default_game_mode_marker() -> String {
    DEFAULT_GAME_MODE_MARKER.to_string()
}

fn default_visibility_millis() -> u64 {
    DEFAULT_VISIBILITY_MILLIS
}

fn default_play_jingle() -> bool {
    true
}

fn default_jingle_sound() -> String {
    DEFAULT_JINGLE_SOUND.to_string()
}

fn default_drop_id() -> String {
    "test".to_string()
}

fn default_drop_headline() -> String {
    "RARE DROP!".to_string()
}

fn default_drop_tier() -> u32 {
    1
}

fn default_drop_quantity() -> u32 {
    1
}

fn default_primary_color() -> u32 {
    0xFFAA00
}

fn default_secondary_color() -> u32 {
    0xFF5555
}
