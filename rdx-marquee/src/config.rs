//! Defines all configuration structures for Marquee components.
//!
//! These structs are deserialized with `serde` from a TOML file layered with
//! `MARQUEE__*` environment variables through the `config` crate. Only the
//! pacing of the components is configurable; the grid layout is fixed (see
//! [`crate::common`]).

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Prefix for environment overrides, e.g. `MARQUEE__COUNTDOWN__INITIAL=30`.
pub const ENV_PREFIX: &str = "MARQUEE";

/// The top-level configuration for a Marquee host.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarqueeConfig {
    /// Settings for the perimeter screen saver.
    #[serde(default)]
    pub animation: AnimationConfig,

    /// Settings for countdown timers.
    #[serde(default)]
    pub countdown: CountdownConfig,
}

/// Screen saver settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnimationConfig {
    /// How often the marker train moves one cell.
    #[serde(default)]
    pub speed: AnimationSpeed,
}

/// Defines how fast the marker train moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    /// One step every 400ms.
    Slow,
    /// One step every 200ms.
    #[default]
    Normal,
    /// One step every 100ms.
    Fast,
    /// A user-defined step period in milliseconds.
    Custom { millis: u64 },
}

impl AnimationSpeed {
    /// The period between two animation frames.
    pub fn interval(&self) -> Duration {
        match self {
            AnimationSpeed::Slow => Duration::from_millis(400),
            AnimationSpeed::Normal => Duration::from_millis(200),
            AnimationSpeed::Fast => Duration::from_millis(100),
            AnimationSpeed::Custom { millis } => Duration::from_millis(*millis),
        }
    }
}

impl From<Duration> for AnimationSpeed {
    /// Rounds down to whole milliseconds, never below 1ms.
    fn from(interval: Duration) -> Self {
        let millis = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        AnimationSpeed::Custom {
            millis: millis.max(1),
        }
    }
}

/// Countdown timer settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CountdownConfig {
    /// The value a countdown starts from, in time units.
    #[serde(default = "default_initial")]
    pub initial: u32,

    /// The length of one time unit in milliseconds.
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

impl CountdownConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            initial: default_initial(),
            tick_millis: default_tick_millis(),
        }
    }
}

// --- Default value functions for serde ---

fn default_initial() -> u32 {
    10
}

fn default_tick_millis() -> u64 {
    1000
}

impl MarqueeConfig {
    /// Loads the configuration from an optional TOML file, then applies
    /// `MARQUEE__SECTION__KEY` environment overrides.
    ///
    /// A missing file is not an error; every setting has a default.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );
        let settings = builder.build().context("failed to read marquee configuration")?;
        Self::finish(settings)
    }

    /// Parses a configuration from TOML text, without environment overrides.
    pub fn from_toml(toml: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .context("failed to parse marquee configuration")?;
        Self::finish(settings)
    }

    fn finish(settings: config::Config) -> Result<Self> {
        let parsed: Self = settings
            .try_deserialize()
            .context("invalid marquee configuration")?;
        parsed.validate()?;
        Ok(parsed)
    }

    /// Rejects settings that would produce a zero-length tick.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.animation.speed.interval().is_zero(),
            "animation speed must be at least 1ms"
        );
        ensure!(
            self.countdown.tick_millis > 0,
            "countdown tick_millis must be at least 1"
        );
        Ok(())
    }
}
