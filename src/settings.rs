//! Player preferences
//!
//! Not persisted: the browser shell builds these from the page controls, the
//! native runner can read them from a JSON file.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::sim::{Difficulty, RoundOptions};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Preset used for the next round
    pub difficulty: Difficulty,

    // === Audio ===
    /// Play catch/bad/win cues
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,

    // === Gameplay ===
    /// Points lost when a good drop falls out uncaught (`None` = no penalty)
    pub miss_penalty: Option<u32>,

    // === Accessibility ===
    /// Reduced motion (skip shake, flashes and confetti)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            sound_enabled: true,
            master_volume: 0.8,
            miss_penalty: None,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse settings JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Round behaviour switches derived from these settings
    pub fn round_options(&self) -> RoundOptions {
        RoundOptions {
            miss_penalty: self.miss_penalty.filter(|p| *p > 0),
        }
    }

    /// Effective screen shake/flash (respects reduced_motion)
    pub fn effective_feedback_motion(&self) -> bool {
        !self.reduced_motion
    }

    /// Effective sound volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.sound_enabled {
            self.master_volume
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "difficulty": "hard" }"#).unwrap();
        assert_eq!(settings.difficulty, Difficulty::Hard);
        assert!(settings.sound_enabled);
        assert_eq!(settings.miss_penalty, None);
    }

    #[test]
    fn test_json_roundtrip_and_clamp() {
        let settings = Settings::from_json(
            r#"{ "difficulty": "easy", "master_volume": 3.0, "miss_penalty": 1 }"#,
        )
        .unwrap();
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.round_options().miss_penalty, Some(1));

        let again = Settings::from_json(&settings.to_json().unwrap()).unwrap();
        assert_eq!(again, settings);
    }

    #[test]
    fn test_zero_penalty_means_none() {
        let settings = Settings {
            miss_penalty: Some(0),
            ..Default::default()
        };
        assert_eq!(settings.round_options(), RoundOptions::default());
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            Settings::from_json(r#"{ "difficulty": "impossible" }"#),
            Err(Error::Settings(_))
        ));
    }

    #[test]
    fn test_muted_volume() {
        let settings = Settings {
            sound_enabled: false,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(), 0.0);
    }
}
