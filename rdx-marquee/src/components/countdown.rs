//! A countdown timer with start, stop, reset and a completion callback.

use crate::config::CountdownConfig;
use crate::events::CountdownEvent;
use crate::ticker::{PeriodicTicker, TickFlow};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex, RwLock};
use tracing::{debug, info, warn};

/// A function closure invoked once when a countdown reaches zero.
pub type CompletionCallback = Box<dyn FnMut() + Send + Sync>;

/// Where a countdown is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownPhase {
    /// Never started, stopped early, or reset.
    Idle,
    /// Ticking down.
    Running,
    /// Reached zero; the completion callback has fired.
    Completed,
}

/// What a single tick did to a `CountdownState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown was not running, or had nothing left to count.
    Ignored,
    /// One unit elapsed and time remains.
    Counted { remaining: u32 },
    /// The countdown just reached zero.
    Completed,
}

/// The bookkeeping behind a countdown, free of any timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownState {
    initial: u32,
    remaining: u32,
    phase: CountdownPhase,
}

impl CountdownState {
    pub fn new(initial: u32) -> Self {
        Self {
            initial,
            remaining: initial,
            phase: CountdownPhase::Idle,
        }
    }

    pub fn initial(&self) -> u32 {
        self.initial
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn phase(&self) -> CountdownPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == CountdownPhase::Running
    }

    /// Restores the initial value and begins running, from any phase.
    pub fn start(&mut self) {
        self.remaining = self.initial;
        self.phase = CountdownPhase::Running;
    }

    /// Leaves `Running` for `Idle`, keeping the remaining value.
    /// Returns `false` if the countdown was not running.
    pub fn stop(&mut self) -> bool {
        if self.phase == CountdownPhase::Running {
            self.phase = CountdownPhase::Idle;
            true
        } else {
            false
        }
    }

    /// Restores the initial value and goes idle, from any phase.
    pub fn reset(&mut self) {
        self.remaining = self.initial;
        self.phase = CountdownPhase::Idle;
    }

    /// Counts one time unit.
    ///
    /// Only the tick that brings `remaining` to zero reports `Completed`. A
    /// countdown started from zero never completes; its ticks are ignored.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != CountdownPhase::Running || self.remaining == 0 {
            return TickOutcome::Ignored;
        }
        self.remaining -= 1;
        if self.remaining == 0 {
            self.phase = CountdownPhase::Completed;
            TickOutcome::Completed
        } else {
            TickOutcome::Counted {
                remaining: self.remaining,
            }
        }
    }
}

/// A countdown driven by a `PeriodicTicker`.
///
/// The ticker is stopped whenever the countdown is stopped, reset, completes,
/// or is dropped.
pub struct Countdown {
    state: Arc<RwLock<CountdownState>>,
    tick_period: Duration,
    ticker: PeriodicTicker,
    events: broadcast::Sender<CountdownEvent>,
}

impl Countdown {
    /// Creates an idle countdown that ticks once per second.
    pub fn new(initial: u32, on_complete: Option<CompletionCallback>) -> Self {
        Self::with_tick_period(initial, Duration::from_secs(1), on_complete)
    }

    /// Creates an idle countdown from a `CountdownConfig`.
    pub fn from_config(config: &CountdownConfig, on_complete: Option<CompletionCallback>) -> Self {
        Self::with_tick_period(config.initial, config.tick_period(), on_complete)
    }

    /// Creates an idle countdown whose time unit is `tick_period`.
    pub fn with_tick_period(
        initial: u32,
        tick_period: Duration,
        on_complete: Option<CompletionCallback>,
    ) -> Self {
        let state = Arc::new(RwLock::new(CountdownState::new(initial)));
        let (events, _) = broadcast::channel(64);
        let on_complete = Arc::new(Mutex::new(on_complete));

        let ticker = PeriodicTicker::new("countdown", {
            let state = state.clone();
            let events = events.clone();
            move || {
                let state = state.clone();
                let events = events.clone();
                let on_complete = on_complete.clone();
                async move {
                    let outcome = state.write().await.tick();
                    match outcome {
                        TickOutcome::Ignored => TickFlow::Stop,
                        TickOutcome::Counted { remaining } => {
                            debug!("Countdown at {}.", remaining);
                            events.send(CountdownEvent::Tick { remaining }).ok();
                            TickFlow::Continue
                        }
                        TickOutcome::Completed => {
                            info!("Countdown completed.");
                            events.send(CountdownEvent::Tick { remaining: 0 }).ok();
                            if let Some(callback) = on_complete.lock().await.as_mut() {
                                callback();
                            }
                            events
                                .send(CountdownEvent::Completed { at: Utc::now() })
                                .ok();
                            TickFlow::Stop
                        }
                    }
                }
            }
        });

        Self {
            state,
            tick_period,
            ticker,
            events,
        }
    }

    /// Starts counting down from the initial value.
    ///
    /// Any running repetition is cancelled first, so restarting never doubles
    /// the decrement rate. Starting after completion runs the full countdown
    /// again.
    pub async fn start(&mut self) {
        self.ticker.stop();
        let from = {
            let mut state = self.state.write().await;
            state.start();
            state.initial()
        };
        self.ticker.start(self.tick_period);
        info!("Countdown started from {}.", from);
        self.events.send(CountdownEvent::Started { from }).ok();
    }

    /// Pauses a running countdown without firing completion. No-op otherwise.
    pub async fn stop(&mut self) {
        self.ticker.stop();
        let mut state = self.state.write().await;
        if state.stop() {
            info!("Countdown stopped at {}.", state.remaining());
            self.events
                .send(CountdownEvent::Stopped {
                    remaining: state.remaining(),
                })
                .ok();
        }
    }

    /// Stops ticking and restores the initial value.
    pub async fn reset(&mut self) {
        self.ticker.stop();
        let mut state = self.state.write().await;
        state.reset();
        debug!("Countdown reset to {}.", state.remaining());
        self.events
            .send(CountdownEvent::Reset {
                remaining: state.remaining(),
            })
            .ok();
    }

    /// Cancels the ticker and leaves `Running` for `Idle`, like `stop`.
    ///
    /// Usable from `Drop`; the state lock is only contended while a tick is
    /// mid-update, which cannot happen on a current-thread runtime.
    pub fn dispose(&mut self) {
        self.ticker.stop();
        match self.state.try_write() {
            Ok(mut state) => {
                if state.stop() {
                    debug!("Countdown disposed at {}.", state.remaining());
                    self.events
                        .send(CountdownEvent::Stopped {
                            remaining: state.remaining(),
                        })
                        .ok();
                }
            }
            Err(_) => warn!("Countdown disposed while a tick held its state."),
        }
    }

    pub async fn remaining(&self) -> u32 {
        self.state.read().await.remaining()
    }

    pub async fn phase(&self) -> CountdownPhase {
        self.state.read().await.phase()
    }

    /// A copy of the current bookkeeping.
    pub async fn snapshot(&self) -> CountdownState {
        self.state.read().await.clone()
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Returns `true` while the underlying ticker is active.
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    /// Subscribes to the `CountdownEvent` stream.
    pub fn subscribe(&self) -> broadcast::Receiver<CountdownEvent> {
        self.events.subscribe()
    }
}
