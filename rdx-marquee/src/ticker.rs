//! The repeating timer that drives every Marquee component.
//!
//! A `PeriodicTicker` owns at most one Tokio task. `start` always cancels the
//! previous task before spawning a new one, and `stop` clears the handle, so
//! two repetitions of the same ticker never coexist. Dropping the ticker
//! cancels it.
//!
//! Components are meant to run on a current-thread runtime, the equivalent of
//! a UI event loop: callbacks run one at a time, and an aborted task never
//! runs its callback again.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

/// The shortest interval a ticker will run at.
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Tells the ticker whether to keep repeating after a callback returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickFlow {
    Continue,
    /// Ends the current repetition, as if `stop` had been called.
    Stop,
}

/// The boxed future produced by one tick.
pub type TickFuture = Pin<Box<dyn Future<Output = TickFlow> + Send>>;

/// A callback invoked once per tick.
pub type TickCallback = Arc<dyn Fn() -> TickFuture + Send + Sync>;

/// Invokes a callback at a fixed interval until stopped.
pub struct PeriodicTicker {
    label: String,
    callback: TickCallback,
    handle: Option<JoinHandle<()>>,
    interval: Option<Duration>,
    ticks: Arc<AtomicU64>,
}

impl PeriodicTicker {
    /// Creates an idle ticker. Nothing runs until `start` is called.
    pub fn new<F, Fut>(label: impl Into<String>, callback: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TickFlow> + Send + 'static,
    {
        Self {
            label: label.into(),
            callback: Arc::new(move || Box::pin(callback()) as TickFuture),
            handle: None,
            interval: None,
            ticks: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Starts invoking the callback once per `interval`.
    ///
    /// The first call happens one `interval` after `start`. A running
    /// repetition is cancelled first. Intervals shorter than [`MIN_INTERVAL`]
    /// are clamped. Must be called from within a Tokio runtime.
    pub fn start(&mut self, interval: Duration) {
        self.stop();

        let interval = if interval < MIN_INTERVAL {
            warn!(
                "Ticker '{}' asked for a {:?} interval; using {:?}.",
                self.label, interval, MIN_INTERVAL
            );
            MIN_INTERVAL
        } else {
            interval
        };

        // A fresh counter keeps a cancelled task from touching the new count.
        let ticks = Arc::new(AtomicU64::new(0));
        self.ticks = ticks.clone();

        let callback = self.callback.clone();
        let label = self.label.clone();
        let first_tick = Instant::now() + interval;
        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval_at(first_tick, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let count = ticks.fetch_add(1, Ordering::Relaxed) + 1;
                trace!("Ticker '{}' tick #{}.", label, count);
                if callback().await == TickFlow::Stop {
                    debug!("Ticker '{}' stopped itself after {} ticks.", label, count);
                    break;
                }
            }
        }));
        self.interval = Some(interval);
        debug!("Ticker '{}' started every {:?}.", self.label, interval);
    }

    /// Cancels the repetition if one is active.
    ///
    /// Returns `true` if a repetition was still running. Calling this on an
    /// idle ticker is a no-op.
    pub fn stop(&mut self) -> bool {
        self.interval = None;
        match self.handle.take() {
            Some(handle) => {
                let was_running = !handle.is_finished();
                handle.abort();
                if was_running {
                    debug!("Ticker '{}' stopped.", self.label);
                }
                was_running
            }
            None => false,
        }
    }

    /// Returns `true` while a repetition is active.
    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map_or(false, |handle| !handle.is_finished())
    }

    /// The interval of the current repetition, if running.
    pub fn interval(&self) -> Option<Duration> {
        self.interval.filter(|_| self.is_running())
    }

    /// Ticks delivered since the last `start`.
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Drop for PeriodicTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

impl fmt::Debug for PeriodicTicker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeriodicTicker")
            .field("label", &self.label)
            .field("running", &self.is_running())
            .field("interval", &self.interval)
            .field("ticks", &self.tick_count())
            .finish()
    }
}
