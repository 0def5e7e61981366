use anyhow::Result;
use marquee::prelude::*;
use marquee::view::render_grid;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::Notify;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // 2. Load the configuration, optionally from a TOML file given as the first argument.
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = MarqueeConfig::load(config_path.as_deref())?;
    info!("Loaded configuration: {:?}", config);
    let speed = config.animation.speed;

    // 3. Create the scope that owns every component.
    let mut scope = Scope::new(config);
    spawn_scope_listener(&scope);

    // 4. Mount a screen saver and a countdown.
    let saver_id = scope.mount_screen_saver();
    let done = Arc::new(Notify::new());
    let countdown_id = {
        let done = done.clone();
        scope.mount_countdown(Some(Box::new(move || done.notify_one())))
    };

    if let Some(saver) = scope.screen_saver_mut(saver_id) {
        spawn_animation_listener(saver);
        saver.start_animation(speed);
    }
    if let Some(countdown) = scope.countdown_mut(countdown_id) {
        spawn_countdown_listener(countdown);
        countdown.start().await;
    }

    // 5. Run until the countdown finishes or Ctrl+C.
    tokio::select! {
        _ = done.notified() => info!("Countdown finished; shutting down."),
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutdown signal received.");
        }
    }

    // 6. Tear everything down.
    scope.dispose();
    info!("{} v{} has shut down.", marquee::CRATE_NAME, marquee::VERSION);
    Ok(())
}

/// Logs mount and unmount events.
fn spawn_scope_listener(scope: &Scope) {
    let mut scope_rx = scope.subscribe();
    tokio::spawn(async move {
        loop {
            match scope_rx.recv().await {
                Ok(event) => info!("[SCOPE] => {:?}", event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("[SCOPE] => skipped {} event(s)", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

/// Prints every fifth frame to avoid spam.
fn spawn_animation_listener(saver: &ScreenSaver) {
    let mut animation_rx = saver.subscribe();
    tokio::spawn(async move {
        loop {
            let event = match animation_rx.recv().await {
                Ok(event) => event,
                Err(RecvError::Lagged(skipped)) => {
                    warn!("[ANIMATION] => skipped {} event(s)", skipped);
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            match event {
                AnimationEvent::Frame(frame) if frame.tick % 5 == 0 => {
                    info!("[FRAME] => #{} leader at {}", frame.tick, frame.trail.leader());
                    println!("{}", render_grid(&frame.grid));
                }
                AnimationEvent::Frame(_) => {}
                other => info!("[ANIMATION] => {:?}", other),
            }
        }
    });
}

fn spawn_countdown_listener(countdown: &Countdown) {
    let mut countdown_rx = countdown.subscribe();
    tokio::spawn(async move {
        loop {
            match countdown_rx.recv().await {
                Ok(event) => info!("[COUNTDOWN] => {:?}", event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!("[COUNTDOWN] => skipped {} event(s)", skipped)
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}
