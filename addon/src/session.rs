//! Session context detection.
//!
//! [`SessionTracker`] is the single writer of [`SessionFlags`]. Other
//! components read the flags through [`SessionTracker::flags`] or a copy of
//! the value; nothing else mutates them.
//!
//! Every input from the host is optional. A missing server address or a
//! missing scoreboard is an expected state (still connecting, loading screen,
//! lobby without a sidebar) and degrades to "no change" or `false`.

use serde::{Deserialize, Serialize};

use crate::config::DetectionConfig;
use crate::scoreboard;

/// Best-effort view of where the player currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionFlags {
    /// Connected to a server whose address carries the target domain suffix.
    pub is_on_target_network: bool,
    /// The scoreboard currently shows the game-mode marker.
    pub is_in_target_game_mode: bool,
    /// Toggled by the user; independent of the other two flags.
    pub is_debug_mode: bool,
}

/// Derives [`SessionFlags`] from connection events and per-tick host reads.
#[derive(Debug)]
pub struct SessionTracker {
    rules: DetectionConfig,
    flags: SessionFlags,
}

impl SessionTracker {
    /// Creates a tracker with all flags cleared.
    pub fn new(rules: DetectionConfig) -> Self {
        Self {
            rules,
            flags: SessionFlags::default(),
        }
    }

    pub fn flags(&self) -> &SessionFlags {
        &self.flags
    }

    /// Replaces the detection rules. Current flags are kept until the next
    /// tick re-derives them.
    pub fn set_rules(&mut self, rules: DetectionConfig) {
        self.rules = rules;
    }

    /// Handles a completed connection.
    ///
    /// A matching address asserts network membership. Anything else leaves the
    /// flag as it was; only [`on_tick`](Self::on_tick) and
    /// [`on_disconnected`](Self::on_disconnected) clear it.
    pub fn on_connected(&mut self, server_address: Option<&str>) {
        let Some(address) = server_address else {
            tracing::debug!(target: "session", "Connected without a resolvable server address");
            return;
        };
        if self.is_target_address(address) {
            self.flags.is_on_target_network = true;
            tracing::info!(target: "session", "Joined target network via {address}");
        }
    }

    /// Handles leaving a server.
    pub fn on_disconnected(&mut self) {
        self.flags.is_on_target_network = false;
        self.flags.is_in_target_game_mode = false;
    }

    /// Per-tick refresh from the latest host reads.
    ///
    /// The game-mode flag follows the scoreboard exactly, with no debounce.
    /// The network flag is re-checked when an address is available and
    /// retained when it is not, so a transient unknown read never flips it.
    pub fn on_tick<S: AsRef<str>>(
        &mut self,
        current_server_address: Option<&str>,
        scoreboard_lines: &[S],
    ) {
        self.flags.is_in_target_game_mode =
            scoreboard::matches(scoreboard_lines, &self.rules.game_mode_marker);

        if let Some(address) = current_server_address {
            self.flags.is_on_target_network = self.is_target_address(address);
        }
    }

    /// Flips debug mode and returns the new value.
    pub fn toggle_debug(&mut self) -> bool {
        self.flags.is_debug_mode = !self.flags.is_debug_mode;
        self.flags.is_debug_mode
    }

    /// Echoes a formatted chat message to the debug log while debug mode is
    /// on. Returns whether the message was echoed.
    pub fn on_chat(&self, formatted_message: &str) -> bool {
        if !self.flags.is_debug_mode {
            return false;
        }
        tracing::debug!(target: "chat", "{formatted_message}");
        true
    }

    fn is_target_address(&self, address: &str) -> bool {
        address.contains(&self.rules.network_suffix)
    }
}
