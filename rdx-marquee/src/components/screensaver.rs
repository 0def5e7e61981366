//! The screen saver: a marker train walking the grid borders on a ticker.

use crate::components::grid::GridState;
use crate::components::walker::MarkerTrail;
use crate::config::AnimationSpeed;
use crate::events::{AnimationEvent, Frame};
use crate::ticker::{PeriodicTicker, TickFlow};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

#[derive(Debug)]
struct SaverState {
    trail: MarkerTrail,
    grid: GridState,
    frames: u64,
}

impl SaverState {
    fn new(trail: MarkerTrail) -> Self {
        Self {
            grid: GridState::from_trail(&trail),
            trail,
            frames: 0,
        }
    }

    /// Moves the train one cell and rebuilds the grid from scratch.
    fn step(&mut self) -> Frame {
        self.trail.advance();
        self.grid.rewrite(&self.trail);
        self.frames += 1;
        Frame {
            tick: self.frames,
            trail: self.trail.clone(),
            grid: self.grid.clone(),
        }
    }
}

/// Owns the marker train, its grid state and the ticker that moves it.
pub struct ScreenSaver {
    state: Arc<RwLock<SaverState>>,
    ticker: PeriodicTicker,
    events: broadcast::Sender<AnimationEvent>,
}

impl ScreenSaver {
    /// Creates a stopped screen saver with the train on the first grid.
    pub fn new() -> Self {
        Self::with_trail(MarkerTrail::new())
    }

    /// Creates a stopped screen saver from an explicit train.
    pub fn with_trail(trail: MarkerTrail) -> Self {
        let state = Arc::new(RwLock::new(SaverState::new(trail)));
        let (events, _) = broadcast::channel(64);

        let ticker = PeriodicTicker::new("screensaver", {
            let state = state.clone();
            let events = events.clone();
            move || {
                let state = state.clone();
                let events = events.clone();
                async move {
                    let frame = state.write().await.step();
                    debug!("Frame #{}: leader at {}.", frame.tick, frame.trail.leader());
                    events.send(AnimationEvent::Frame(Arc::new(frame))).ok();
                    TickFlow::Continue
                }
            }
        });

        Self {
            state,
            ticker,
            events,
        }
    }

    /// Starts moving the train one cell per `speed` interval.
    ///
    /// Restarting while running replaces the previous repetition.
    pub fn start_animation(&mut self, speed: impl Into<AnimationSpeed>) {
        let interval = speed.into().interval();
        self.ticker.start(interval);
        info!("Screen saver started at {:?} per step.", interval);
        self.events.send(AnimationEvent::Started { interval }).ok();
    }

    /// Freezes the train where it is. No-op when already stopped.
    pub fn stop_animation(&mut self) {
        if self.ticker.stop() {
            info!("Screen saver stopped.");
            self.events.send(AnimationEvent::Stopped).ok();
        }
    }

    /// Stops the animation; used when the owning scope unmounts it.
    pub fn dispose(&mut self) {
        self.stop_animation();
    }

    /// A copy of the current grid state, for rendering.
    pub async fn grid(&self) -> GridState {
        self.state.read().await.grid.clone()
    }

    /// A copy of the current marker positions, leader first.
    pub async fn trail(&self) -> MarkerTrail {
        self.state.read().await.trail.clone()
    }

    /// Frames produced since this screen saver was created.
    pub async fn frames(&self) -> u64 {
        self.state.read().await.frames
    }

    pub fn is_running(&self) -> bool {
        self.ticker.is_running()
    }

    /// The current step period, if running.
    pub fn interval(&self) -> Option<Duration> {
        self.ticker.interval()
    }

    /// Subscribes to the `AnimationEvent` stream.
    pub fn subscribe(&self) -> broadcast::Receiver<AnimationEvent> {
        self.events.subscribe()
    }
}

impl Default for ScreenSaver {
    fn default() -> Self {
        Self::new()
    }
}
