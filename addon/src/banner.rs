//! Drop banner lifecycle.
//!
//! The engine holds at most one [`DropEvent`]. A new trigger replaces the
//! current one outright, restarting the visibility window from the new
//! event's `created_at`. Expiry is lazy: [`BannerEngine::render`] notices it
//! and returns the engine to [`BannerState::Idle`]. Since every render is
//! computed from absolute timestamps, a skipped frame costs nothing but that
//! frame.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::drops::{DropEvent, DropRejected, Millis};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerState {
    /// Nothing to draw.
    Idle,
    /// A drop is active and has not yet reached its visibility duration.
    Showing,
}

/// Everything the overlay needs to draw one frame of the banner.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderParams {
    pub headline: String,
    pub tier: u32,
    pub quantity: u32,
    pub primary_color: u32,
    pub secondary_color: u32,
    /// Progress through the visibility window, in `[0, 1)`. Drives the
    /// fade/slide interpolation.
    pub fraction_elapsed: f32,
}

pub struct BannerEngine {
    active: Option<DropEvent>,
    visibility_duration_millis: Millis,
}

impl BannerEngine {
    /// `visibility_duration_millis` must be non-zero; callers pass the value
    /// already clamped by [`BannerConfig`](crate::config::BannerConfig).
    pub fn new(visibility_duration_millis: Millis) -> Self {
        Self {
            active: None,
            visibility_duration_millis: visibility_duration_millis.max(1),
        }
    }

    pub fn visibility_duration_millis(&self) -> Millis {
        self.visibility_duration_millis
    }

    /// Changes the visibility duration. An active banner is measured against
    /// the new duration from the next render on.
    pub fn set_visibility_duration(&mut self, millis: Millis) {
        self.visibility_duration_millis = millis.max(1);
    }

    pub fn state(&self) -> BannerState {
        match self.active {
            Some(_) => BannerState::Showing,
            None => BannerState::Idle,
        }
    }

    pub fn active(&self) -> Option<&DropEvent> {
        self.active.as_ref()
    }

    /// Makes `event` the active banner, replacing any banner still on screen.
    ///
    /// Invalid events are refused and the current banner is left untouched.
    pub fn trigger(&mut self, event: DropEvent) -> Result<(), DropRejected> {
        event.validate()?;
        if let Some(previous) = self.active.replace(event) {
            tracing::debug!(target: "banner", "Replacing active drop '{}'", previous.id);
        }
        Ok(())
    }

    /// Computes this frame's banner, or `None` when nothing should be drawn.
    ///
    /// A `now` earlier than the drop's `created_at` is treated as zero
    /// elapsed time.
    pub fn render(&mut self, now: Millis) -> Option<RenderParams> {
        let drop = self.active.as_ref()?;
        let elapsed = now.saturating_sub(drop.created_at);

        if elapsed >= self.visibility_duration_millis {
            tracing::debug!(target: "banner", "Drop '{}' expired after {elapsed} ms", drop.id);
            self.active = None;
            return None;
        }

        Some(RenderParams {
            headline: drop.headline.clone(),
            tier: drop.tier,
            quantity: drop.quantity,
            primary_color: drop.primary_color,
            secondary_color: drop.secondary_color,
            fraction_elapsed: (elapsed as f64 / self.visibility_duration_millis as f64) as f32,
        })
    }
}

/// Monotonic millisecond clock anchored at construction.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { start: Instant::now() }
    }

    pub fn now_millis(&self) -> Millis {
        self.start.elapsed().as_millis() as Millis
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DebugDropConfig;

    const DURATION: Millis = 3_000;

    fn rare_drop(created_at: Millis) -> DropEvent {
        DropEvent::from_sample(&DebugDropConfig::default(), created_at)
    }

    fn named_drop(id: &str, headline: &str, created_at: Millis) -> DropEvent {
        DropEvent {
            id: id.to_string(),
            headline: headline.to_string(),
            tier: 4,
            quantity: 7,
            created_at,
            primary_color: 0x55FFFF,
            secondary_color: 0xAA00AA,
        }
    }

    // ── state machine ─────────────────────────────────────────────────────────

    #[test]
    fn new_engine_is_idle() {
        let mut engine = BannerEngine::new(DURATION);
        assert_eq!(engine.state(), BannerState::Idle);
        assert!(engine.render(0).is_none());
    }

    #[test]
    fn trigger_moves_to_showing() {
        let mut engine = BannerEngine::new(DURATION);
        engine.trigger(rare_drop(1_000)).unwrap();
        assert_eq!(engine.state(), BannerState::Showing);
        assert_eq!(engine.active().map(|d| d.id.as_str()), Some("test"));
    }

    #[test]
    fn expiry_returns_to_idle() {
        let mut engine = BannerEngine::new(DURATION);
        engine.trigger(rare_drop(1_000)).unwrap();
        assert!(engine.render(1_000 + DURATION).is_none());
        assert_eq!(engine.state(), BannerState::Idle);
        assert!(engine.active().is_none());
    }

    // ── render ────────────────────────────────────────────────────────────────

    #[test]
    fn rare_drop_example() {
        let mut engine = BannerEngine::new(DURATION);
        engine.trigger(rare_drop(1_000)).unwrap();

        let params = engine.render(1_000).unwrap();
        assert_eq!(
            params,
            RenderParams {
                headline: "RARE DROP!".to_string(),
                tier: 1,
                quantity: 1,
                primary_color: 0xFFAA00,
                secondary_color: 0xFF5555,
                fraction_elapsed: 0.0,
            }
        );

        assert!(engine.render(4_000).is_none());
    }

    #[test]
    fn last_millisecond_is_still_visible() {
        let mut engine = BannerEngine::new(DURATION);
        engine.trigger(rare_drop(1_000)).unwrap();

        let params = engine.render(1_000 + DURATION - 1).unwrap();
        assert!(params.fraction_elapsed < 1.0);
        assert!(params.fraction_elapsed > 0.999);

        assert!(engine.render(1_000 + DURATION).is_none());
        assert!(engine.render(1_000 + DURATION * 10).is_none());
        assert!(engine.render(Millis::MAX).is_none());
    }

    #[test]
    fn fraction_tracks_elapsed_time() {
        let mut engine = BannerEngine::new(DURATION);
        engine.trigger(rare_drop(0)).unwrap();
        let half = engine.render(1_500).unwrap();
        assert!((half.fraction_elapsed - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn render_before_creation_counts_as_zero_elapsed() {
        let mut engine = BannerEngine::new(DURATION);
        engine.trigger(rare_drop(5_000)).unwrap();
        let params = engine.render(4_000).unwrap();
        assert_eq!(params.fraction_elapsed, 0.0);
    }

    #[test]
    fn skipped_frames_do_not_extend_lifetime() {
        let mut engine = BannerEngine::new(DURATION);
        engine.trigger(rare_drop(0)).unwrap();
        // No renders at all until well past the window.
        assert!(engine.render(DURATION + 250).is_none());
    }

    // ── trigger: replacement ──────────────────────────────────────────────────

    #[test]
    fn second_trigger_replaces_first() {
        let mut engine = BannerEngine::new(DURATION);
        engine.trigger(rare_drop(1_000)).unwrap();
        engine.trigger(named_drop("pet", "CRAZY RARE DROP!", 2_000)).unwrap();

        let params = engine.render(2_000).unwrap();
        assert_eq!(params.headline, "CRAZY RARE DROP!");
        assert_eq!(params.tier, 4);
        assert_eq!(params.quantity, 7);
        assert_eq!(params.primary_color, 0x55FFFF);
        assert_eq!(params.secondary_color, 0xAA00AA);
        assert_eq!(params.fraction_elapsed, 0.0);
    }

    #[test]
    fn replacement_restarts_the_window() {
        let mut engine = BannerEngine::new(DURATION);
        engine.trigger(rare_drop(0)).unwrap();
        engine.trigger(named_drop("pet", "CRAZY RARE DROP!", 2_500)).unwrap();

        // Past the first drop's window, inside the second's.
        let params = engine.render(DURATION + 100).unwrap();
        assert_eq!(params.headline, "CRAZY RARE DROP!");
        assert!(engine.render(2_500 + DURATION).is_none());
    }

    #[test]
    fn trigger_after_expiry_shows_again() {
        let mut engine = BannerEngine::new(DURATION);
        engine.trigger(rare_drop(0)).unwrap();
        assert!(engine.render(DURATION).is_none());

        engine.trigger(rare_drop(10_000)).unwrap();
        assert!(engine.render(10_001).is_some());
    }

    // ── trigger: validation ───────────────────────────────────────────────────

    #[test]
    fn invalid_drop_keeps_current_banner() {
        let mut engine = BannerEngine::new(DURATION);
        engine.trigger(rare_drop(0)).unwrap();

        let bad = DropEvent { quantity: 0, ..named_drop("pet", "CRAZY RARE DROP!", 100) };
        assert!(matches!(engine.trigger(bad), Err(DropRejected::ZeroQuantity { .. })));

        let params = engine.render(100).unwrap();
        assert_eq!(params.headline, "RARE DROP!");
    }

    #[test]
    fn invalid_drop_on_idle_engine_stays_idle() {
        let mut engine = BannerEngine::new(DURATION);
        let bad = DropEvent { primary_color: 0x0100_0000, ..rare_drop(0) };
        assert!(engine.trigger(bad).is_err());
        assert_eq!(engine.state(), BannerState::Idle);
    }

    // ── duration ──────────────────────────────────────────────────────────────

    #[test]
    fn zero_duration_is_raised_to_one_millisecond() {
        let engine = BannerEngine::new(0);
        assert_eq!(engine.visibility_duration_millis(), 1);
    }

    #[test]
    fn shortened_duration_applies_to_active_banner() {
        let mut engine = BannerEngine::new(DURATION);
        engine.trigger(rare_drop(0)).unwrap();
        engine.set_visibility_duration(1_000);
        assert!(engine.render(1_000).is_none());
    }

    // ── clock ─────────────────────────────────────────────────────────────────

    #[test]
    fn monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now_millis();
        let b = clock.now_millis();
        assert!(b >= a);
    }
}
