//! Drop Catcher - A timed catch-the-drops arcade mini-game
//!
//! Core modules:
//! - `sim`: Deterministic round simulation (timers, spawning, ramp, scoring)
//! - `settings`: Player preferences and round options
//! - `error`: Error types shared by the simulation and the shells
//! - `audio`: Procedural sound cues (browser only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Countdown clock period
    pub const CLOCK_PERIOD_MS: u32 = 1000;

    /// Difficulty ramp period
    pub const RAMP_PERIOD_MS: u32 = 5000;
    /// Bad-drop probability added per ramp step
    pub const RAMP_BAD_STEP: f64 = 0.08;
    /// Bad-drop probability never exceeds this
    pub const BAD_PROBABILITY_CEILING: f64 = 0.75;
    /// Spawn interval removed per ramp step (ms)
    pub const RAMP_SPAWN_STEP_MS: u32 = 70;
    /// Spawn interval never drops below this (ms)
    pub const SPAWN_INTERVAL_FLOOR_MS: u32 = 450;
    /// Fall duration removed per ramp step (ms)
    pub const RAMP_FALL_STEP_MS: u32 = 120;
    /// Base fall duration never drops below this (ms)
    pub const FALL_DURATION_FLOOR_MS: u32 = 1800;

    /// Drop size range in pixels (min inclusive, max exclusive)
    pub const DROP_SIZE_MIN: f32 = 50.0;
    pub const DROP_SIZE_MAX: f32 = 80.0;
    /// Symmetric fall-duration jitter (ms)
    pub const FALL_JITTER_MS: f32 = 300.0;
    /// A single drop never falls faster than this (ms)
    pub const MIN_DROP_FALL_MS: u32 = 1400;

    /// Score change for catching a good drop
    pub const GOOD_CATCH_POINTS: i32 = 1;
    /// Score change for catching a bad drop
    pub const BAD_CATCH_POINTS: i32 = -2;

    /// Play area used until the host reports its real size
    pub const DEFAULT_PLAY_AREA_WIDTH: f32 = 480.0;
    pub const DEFAULT_PLAY_AREA_HEIGHT: f32 = 640.0;
}
