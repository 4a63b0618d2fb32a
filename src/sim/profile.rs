//! Difficulty presets
//!
//! Each named mode tunes round length, win threshold and the starting values
//! of the ramped knobs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    /// Starting configuration for a round at this difficulty
    pub fn config(&self) -> RoundConfig {
        match self {
            Difficulty::Easy => RoundConfig {
                duration_secs: 45,
                win_score: 10,
                spawn_interval_ms: 1000,
                fall_duration_ms: 3800,
                bad_probability: 0.20,
            },
            Difficulty::Normal => RoundConfig {
                duration_secs: 30,
                win_score: 15,
                spawn_interval_ms: 900,
                fall_duration_ms: 3600,
                bad_probability: 0.25,
            },
            Difficulty::Hard => RoundConfig {
                duration_secs: 20,
                win_score: 20,
                spawn_interval_ms: 750,
                fall_duration_ms: 3200,
                bad_probability: 0.30,
            },
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(Error::UnknownProfile(s.to_string())),
        }
    }
}

/// Round tuning selected at start. Never mutated; the ramp works on a copy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Countdown length in seconds
    pub duration_secs: u32,
    /// Final score needed to win
    pub win_score: u32,
    /// Initial time between spawns (ms)
    pub spawn_interval_ms: u32,
    /// Initial base fall duration (ms)
    pub fall_duration_ms: u32,
    /// Initial chance that a spawned drop is bad
    pub bad_probability: f64,
}

/// Look up a preset by name
pub fn get_profile(name: &str) -> Result<RoundConfig> {
    name.parse::<Difficulty>().map(|d| d.config())
}
