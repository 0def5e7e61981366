//! # Marquee
//!
//! Small tick-driven UI helpers: a perimeter "screen saver" and countdown timers.
//!
//! ## Core Concepts
//!
//! - **PeriodicTicker**: a repeating timer with idempotent `start`/`stop` that is
//!   cancelled when dropped. Every component owns exactly one.
//! - **Perimeter walk**: a train of four markers walks clockwise along the
//!   border of three 7x5 grids, handing off from grid to grid. Followers trail
//!   the leader one step behind.
//! - **Countdown**: counts down from a configured value once per time unit and
//!   fires a completion callback exactly once.
//! - **Scope**: mounts components, hands out `ComponentId`s, and disposes every
//!   mounted component when it is dropped.
//! - **Event-Driven rendering**: components broadcast `AnimationEvent`s and
//!   `CountdownEvent`s so a view layer re-renders only when state changes.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use marquee::prelude::*;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let mut scope = Scope::new(MarqueeConfig::default());
//!
//!     let saver = scope.mount_screen_saver();
//!     let mut frames = scope.screen_saver(saver).unwrap().subscribe();
//!     scope.screen_saver_mut(saver).unwrap().start_animation(AnimationSpeed::Normal);
//!
//!     let timer = scope.mount_countdown(Some(Box::new(|| println!("Time's up!"))));
//!     scope.countdown_mut(timer).unwrap().start().await;
//!
//!     while let Ok(event) = frames.recv().await {
//!         if let AnimationEvent::Frame(frame) = event {
//!             println!("{}", marquee::view::render_grid(&frame.grid));
//!         }
//!     }
//!
//!     // Dropping the scope stops both tickers.
//!     Ok(())
//! }
//! ```

pub const CRATE_NAME: &str = "Marquee";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Declare all the modules in the crate.
pub mod common;
pub mod components;
pub mod config;
pub mod events;
pub mod scope;
pub mod ticker;
pub mod view;

/// A prelude module for easy importing of the most common Marquee types.
pub mod prelude {
    pub use crate::common::{ComponentId, Position, COLS, GRID_COUNT, MARKER_COUNT, ROWS};
    pub use crate::components::countdown::{CompletionCallback, Countdown, CountdownPhase};
    pub use crate::components::grid::GridState;
    pub use crate::components::screensaver::ScreenSaver;
    pub use crate::components::walker::{next_position, MarkerTrail};
    pub use crate::config::{AnimationSpeed, MarqueeConfig};
    pub use crate::events::{AnimationEvent, ComponentKind, CountdownEvent, ScopeEvent};
    pub use crate::scope::Scope;
    pub use crate::ticker::{PeriodicTicker, TickFlow};
}
