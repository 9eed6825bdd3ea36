//! Wiring between host signals and the core components.
//!
//! [`Addon`] owns the session tracker and the banner engine and is driven by
//! the event loop in `main.rs`. It also remembers the most recent host reads
//! (current server address, scoreboard) so each tick sees them, and keeps the
//! status snapshot that is written to disk when it changes.
use crate::banner::{BannerEngine, BannerState, RenderParams};
use crate::config::Config;
use crate::drops::{DropEvent, Millis};
use crate::host::HostCommand;
use crate::session::{SessionFlags, SessionTracker};
use crate::status::AddonStatus;

/// Something the host should do in response to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    PlaySound(String),
}

/// Latest values the host reported. `None` means unknown / not shown.
#[derive(Debug, Default)]
struct HostReads {
    server_address: Option<String>,
    scoreboard: Option<Vec<String>>,
}

pub struct Addon {
    config: Config,
    tracker: SessionTracker,
    banner: BannerEngine,
    reads: HostReads,
    status: AddonStatus,
}

impl Addon {
    pub fn new(config: Config) -> Self {
        Self {
            tracker: SessionTracker::new(config.detection.clone()),
            banner: BannerEngine::new(config.banner.effective_visibility_millis()),
            reads: HostReads::default(),
            status: AddonStatus::new(),
            config,
        }
    }

    pub fn flags(&self) -> &SessionFlags {
        self.tracker.flags()
    }

    pub fn banner_state(&self) -> BannerState {
        self.banner.state()
    }

    pub fn status(&self) -> &AddonStatus {
        &self.status
    }

    /// Applies a reloaded config. Flags and the active banner are kept.
    pub fn apply_config(&mut self, config: Config) {
        self.tracker.set_rules(config.detection.clone());
        self.banner
            .set_visibility_duration(config.banner.effective_visibility_millis());
        self.config = config;
    }

    /// Applies one host command at `now`.
    pub fn handle(&mut self, command: HostCommand, now: Millis) -> Option<Cue> {
        match command {
            HostCommand::Connect(address) => {
                self.tracker.on_connected(address.as_deref());
                self.reads.server_address = address;
                None
            }
            HostCommand::Disconnect => {
                self.tracker.on_disconnected();
                self.reads = HostReads::default();
                tracing::info!(target: "session", "Disconnected");
                None
            }
            HostCommand::Server(address) => {
                self.reads.server_address = address;
                None
            }
            HostCommand::Scoreboard(lines) => {
                self.reads.scoreboard = lines;
                None
            }
            HostCommand::Chat(message) => {
                self.tracker.on_chat(&message);
                None
            }
            HostCommand::DebugKey => {
                let enabled = self.tracker.toggle_debug();
                tracing::info!(target: "session", "Debug mode: {enabled}");
                let sample = DropEvent::from_sample(&self.config.debug_drop, now);
                self.trigger(sample)
            }
            HostCommand::Drop {
                id,
                tier,
                quantity,
                headline,
            } => self.trigger(DropEvent {
                id,
                headline,
                tier,
                quantity,
                created_at: now,
                primary_color: self.config.debug_drop.primary_color,
                secondary_color: self.config.debug_drop.secondary_color,
            }),
            HostCommand::Quit => None,
        }
    }

    /// Triggers `drop` on the banner engine and records the outcome.
    /// Returns the sound cue for an accepted drop when the jingle is enabled.
    pub fn trigger(&mut self, drop: DropEvent) -> Option<Cue> {
        let id = drop.id.clone();
        match self.banner.trigger(drop) {
            Ok(()) => {
                tracing::info!(target: "banner", "Showing drop '{id}'");
                self.status.last_drop_timestamp = Some(chrono::Local::now().to_rfc3339());
                self.status.error = None;
                self.config
                    .banner
                    .play_jingle
                    .then(|| Cue::PlaySound(self.config.banner.jingle_sound.clone()))
            }
            Err(e) => {
                tracing::warn!(target: "banner", "Drop refused: {e}");
                self.status.error = Some(e.to_string());
                None
            }
        }
    }

    /// Runs one tick: refreshes the session flags from the latest host reads,
    /// then renders the banner.
    pub fn tick(&mut self, now: Millis) -> Option<RenderParams> {
        let lines = self.reads.scoreboard.as_deref().unwrap_or(&[]);
        self.tracker
            .on_tick(self.reads.server_address.as_deref(), lines);

        let was_showing = self.banner.state() == BannerState::Showing;
        let params = self.banner.render(now);
        if was_showing && params.is_none() {
            tracing::info!(target: "banner", "Banner hidden");
        }
        params
    }

    /// Refreshes the derived status fields. Returns `true` if anything
    /// changed since the last call, meaning the snapshot should be written.
    pub fn refresh_status(&mut self) -> bool {
        let next = AddonStatus {
            banner: self.banner.state(),
            active_drop: self.banner.active().map(|d| d.id.clone()),
            session: *self.tracker.flags(),
            ..self.status.clone()
        };
        let changed = next != self.status;
        self.status = next;
        changed
    }
}
