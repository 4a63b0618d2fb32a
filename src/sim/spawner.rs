//! Drop spawning
//!
//! Rolls kind, size, horizontal position and fall duration for each new drop.
//! Motion itself is left to the presentation layer's animation.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::ramp::Knobs;
use crate::consts::*;

/// Drop identifier, unique for the lifetime of a `Round`
pub type DropId = u32;

/// Drop types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DropKind {
    /// Catch for points
    Good,
    /// Catch for a penalty
    Bad,
}

impl DropKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DropKind::Good => "good",
            DropKind::Bad => "bad",
        }
    }

    /// Score delta for catching this kind
    pub fn catch_points(&self) -> i32 {
        match self {
            DropKind::Good => GOOD_CATCH_POINTS,
            DropKind::Bad => BAD_CATCH_POINTS,
        }
    }
}

/// A falling drop handed to the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterDrop {
    pub id: DropId,
    pub kind: DropKind,
    /// How long the fall animation should take (ms)
    pub fall_duration_ms: u32,
    /// Left edge in play-area pixels
    pub x: f32,
    /// Width and height in pixels
    pub size: f32,
}

/// Play area dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayArea {
    pub width: f32,
    pub height: f32,
}

impl Default for PlayArea {
    fn default() -> Self {
        Self {
            width: DEFAULT_PLAY_AREA_WIDTH,
            height: DEFAULT_PLAY_AREA_HEIGHT,
        }
    }
}

impl PlayArea {
    /// Distance a drop of `size` travels to leave the bottom edge
    pub fn fall_distance(&self, size: f32) -> f32 {
        self.height + size + 12.0
    }
}

/// Roll a new drop using the current knobs
pub fn spawn_drop<R: Rng>(rng: &mut R, id: DropId, knobs: &Knobs, area: &PlayArea) -> WaterDrop {
    let kind = if rng.random_bool(knobs.bad_probability.clamp(0.0, 1.0)) {
        DropKind::Bad
    } else {
        DropKind::Good
    };

    let size = rng.random_range(DROP_SIZE_MIN..DROP_SIZE_MAX);

    // Keep the whole drop inside the play area
    let max_x = area.width - size;
    let x = if max_x > 0.0 && max_x.is_finite() {
        rng.random_range(0.0..max_x)
    } else {
        0.0
    };

    let jitter = rng.random_range(-FALL_JITTER_MS..FALL_JITTER_MS);
    let fall_duration_ms =
        (knobs.fall_duration_ms as f32 + jitter).max(MIN_DROP_FALL_MS as f32) as u32;

    WaterDrop {
        id,
        kind,
        fall_duration_ms,
        x,
        size,
    }
}
