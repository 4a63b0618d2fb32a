//! Difficulty ramp
//!
//! Every ramp period the round gets a little harder: more bad drops, faster
//! spawns, faster falls. Each knob is clamped so long rounds stay playable.

use serde::{Deserialize, Serialize};

use super::profile::RoundConfig;
use crate::consts::*;

/// Working copy of the tunables that the ramp escalates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Knobs {
    pub spawn_interval_ms: u32,
    pub fall_duration_ms: u32,
    pub bad_probability: f64,
}

impl Knobs {
    /// Starting knobs for a round
    pub fn from_config(config: &RoundConfig) -> Self {
        Self {
            spawn_interval_ms: config.spawn_interval_ms,
            fall_duration_ms: config.fall_duration_ms,
            bad_probability: config.bad_probability.clamp(0.0, BAD_PROBABILITY_CEILING),
        }
    }

    /// Apply one ramp step
    ///
    /// Knobs that start beyond a bound are left alone rather than snapped, so
    /// the ramp never makes a round easier.
    pub fn escalate(&mut self) {
        self.bad_probability = (self.bad_probability + RAMP_BAD_STEP)
            .min(BAD_PROBABILITY_CEILING)
            .max(self.bad_probability);
        self.spawn_interval_ms = self
            .spawn_interval_ms
            .saturating_sub(RAMP_SPAWN_STEP_MS)
            .max(SPAWN_INTERVAL_FLOOR_MS)
            .min(self.spawn_interval_ms);
        self.fall_duration_ms = self
            .fall_duration_ms
            .saturating_sub(RAMP_FALL_STEP_MS)
            .max(FALL_DURATION_FLOOR_MS)
            .min(self.fall_duration_ms);
    }

    /// True once no knob can move further
    pub fn is_maxed(&self) -> bool {
        self.bad_probability >= BAD_PROBABILITY_CEILING
            && self.spawn_interval_ms <= SPAWN_INTERVAL_FLOOR_MS
            && self.fall_duration_ms <= FALL_DURATION_FLOOR_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::profile::Difficulty;
    use proptest::prelude::*;

    #[test]
    fn test_single_step_from_normal() {
        let mut knobs = Knobs::from_config(&Difficulty::Normal.config());
        knobs.escalate();
        assert_eq!(knobs.spawn_interval_ms, 830);
        assert_eq!(knobs.fall_duration_ms, 3480);
        assert!((knobs.bad_probability - 0.33).abs() < 1e-9);
    }

    #[test]
    fn test_ramp_reaches_bounds() {
        let mut knobs = Knobs::from_config(&Difficulty::Hard.config());
        for _ in 0..100 {
            knobs.escalate();
        }
        assert!(knobs.is_maxed());
        assert_eq!(knobs.spawn_interval_ms, SPAWN_INTERVAL_FLOOR_MS);
        assert_eq!(knobs.fall_duration_ms, FALL_DURATION_FLOOR_MS);
        assert!((knobs.bad_probability - BAD_PROBABILITY_CEILING).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_ramp_is_monotonic_and_bounded(
            spawn in 0u32..5000,
            fall in 0u32..10000,
            bad in 0.0f64..1.0,
            steps in 0usize..200,
        ) {
            let config = RoundConfig {
                duration_secs: 30,
                win_score: 15,
                spawn_interval_ms: spawn,
                fall_duration_ms: fall,
                bad_probability: bad,
            };
            let mut knobs = Knobs::from_config(&config);
            for _ in 0..steps {
                let before = knobs;
                knobs.escalate();
                prop_assert!(knobs.spawn_interval_ms <= before.spawn_interval_ms);
                prop_assert!(knobs.fall_duration_ms <= before.fall_duration_ms);
                prop_assert!(knobs.bad_probability >= before.bad_probability);
                prop_assert!(knobs.bad_probability <= BAD_PROBABILITY_CEILING);
                if before.spawn_interval_ms >= SPAWN_INTERVAL_FLOOR_MS {
                    prop_assert!(knobs.spawn_interval_ms >= SPAWN_INTERVAL_FLOOR_MS);
                }
                if before.fall_duration_ms >= FALL_DURATION_FLOOR_MS {
                    prop_assert!(knobs.fall_duration_ms >= FALL_DURATION_FLOOR_MS);
                }
            }
        }
    }
}
