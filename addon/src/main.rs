use tokio::sync::mpsc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing_subscriber::EnvFilter;

use sane_skies::addon::{Addon, Cue};
use sane_skies::banner::MonotonicClock;
use sane_skies::event::AddonEvent;
use sane_skies::{config, host, paths, status};

/// 20 game ticks per second.
const TICK_INTERVAL_MILLIS: u64 = 50;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // ── Data directory ────────────────────────────────────────────────────────
    let data_dir = match paths::app_data_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::error!("{e:#}");
            std::process::exit(1);
        }
    };
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!("Failed to create data directory {}: {e}", data_dir.display());
        std::process::exit(1);
    }

    // ── Configuration ─────────────────────────────────────────────────────────
    let config_path = paths::config_file_path(&data_dir);
    let initial_config = config::load_or_default(&config_path).unwrap_or_else(|e| {
        tracing::warn!(target: "config", "{e:#} (using defaults)");
        config::Config::default()
    });

    // ── Initial status ────────────────────────────────────────────────────────
    let status_path = paths::status_file_path(&data_dir);
    let mut addon = Addon::new(initial_config);
    status::write_status(&status_path, addon.status());

    let clock = MonotonicClock::new();
    let (event_tx, mut event_rx) = mpsc::channel::<AddonEvent>(64);

    // ── Background tasks ──────────────────────────────────────────────────────
    tokio::spawn(config::watch_config(config_path, event_tx.clone()));
    tokio::spawn(host::read_stdin(event_tx.clone()));

    {
        let tx = event_tx.clone();
        tokio::spawn(async move {
            let mut ticker = interval(Duration::from_millis(TICK_INTERVAL_MILLIS));
            // A late tick is simply lost; the next one recomputes from the clock.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                if tx.send(AddonEvent::Tick).await.is_err() {
                    break;
                }
            }
        });
    }

    // Graceful shutdown on Ctrl+C.
    {
        let tx = event_tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = tx.send(AddonEvent::Shutdown).await;
            }
        });
    }

    tracing::info!("sane-skies v{} started", env!("CARGO_PKG_VERSION"));

    // ── Event loop ────────────────────────────────────────────────────────────
    while let Some(evt) = event_rx.recv().await {
        match evt {
            AddonEvent::Host(command) => {
                if let Some(Cue::PlaySound(sound)) = addon.handle(command, clock.now_millis()) {
                    tracing::info!(target: "sound", "Play {sound}");
                }
            }

            AddonEvent::Tick => {
                if let Some(params) = addon.tick(clock.now_millis()) {
                    tracing::trace!(
                        target: "banner",
                        "{} x{} (tier {}) at {:.2}",
                        params.headline,
                        params.quantity,
                        params.tier,
                        params.fraction_elapsed
                    );
                }
            }

            AddonEvent::ConfigReloaded(new_config) => {
                tracing::info!(target: "config", "Config reloaded");
                addon.apply_config(new_config);
            }

            AddonEvent::Shutdown => {
                tracing::info!("Shutting down");
                addon.refresh_status();
                status::write_status(&status_path, addon.status());
                break;
            }
        }

        if addon.refresh_status() {
            status::write_status(&status_path, addon.status());
        }
    }
}
