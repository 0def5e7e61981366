//! Defines all public event types broadcast by Marquee components.
//!
//! A view layer subscribes to these streams to re-render when a component
//! changes, instead of polling component state.

use crate::common::ComponentId;
use crate::components::grid::GridState;
use crate::components::walker::MarkerTrail;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

/// One rendered step of the screen saver.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frames produced since the screen saver was created.
    pub tick: u64,
    /// Marker positions after this step, leader first.
    pub trail: MarkerTrail,
    /// The rebuilt cell matrix for every grid.
    pub grid: GridState,
}

/// Events published by a `ScreenSaver`.
#[derive(Debug, Clone)]
pub enum AnimationEvent {
    /// The animation began moving at the given step period.
    Started { interval: Duration },
    /// The train moved one cell.
    Frame(Arc<Frame>),
    /// The animation was stopped or disposed.
    Stopped,
}

/// Events published by a `Countdown`.
#[derive(Debug, Clone)]
pub enum CountdownEvent {
    /// The countdown (re)started from its initial value.
    Started { from: u32 },
    /// One time unit elapsed.
    Tick { remaining: u32 },
    /// The countdown reached zero.
    Completed { at: DateTime<Utc> },
    /// The countdown was stopped before reaching zero.
    Stopped { remaining: u32 },
    /// The countdown was reset to its initial value.
    Reset { remaining: u32 },
}

/// The kind of component mounted on a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentKind {
    ScreenSaver,
    Countdown,
}

/// Events related to mounting and disposing components on a `Scope`.
#[derive(Debug, Clone)]
pub enum ScopeEvent {
    Mounted {
        id: ComponentId,
        kind: ComponentKind,
        at: DateTime<Utc>,
    },
    Unmounted {
        id: ComponentId,
        kind: ComponentKind,
        at: DateTime<Utc>,
    },
}
