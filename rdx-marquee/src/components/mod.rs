//! Contains the building blocks hosted by a `Scope`.
//!
//! The walker and grid modules are pure state; the screen saver and the
//! countdown wrap that state with a `PeriodicTicker` and an event stream.

pub mod countdown;
pub mod grid;
pub mod screensaver;
pub mod walker;
