//! Score keeping and one-shot milestone messages

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A score threshold that announces itself once per round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MilestoneDef {
    pub threshold: u32,
    pub message: &'static str,
}

/// Milestones in ascending threshold order
pub const MILESTONES: &[MilestoneDef] = &[
    MilestoneDef {
        threshold: 5,
        message: "Nice flow! 5 points.",
    },
    MilestoneDef {
        threshold: 10,
        message: "Halfway there! 10 points.",
    },
    MilestoneDef {
        threshold: 15,
        message: "Clean streak! 15 points.",
    },
    MilestoneDef {
        threshold: 20,
        message: "Water champion!",
    },
];

/// Score plus the milestones already announced this round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    score: u32,
    fired: BTreeSet<u32>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Thresholds that have fired this round
    pub fn fired_milestones(&self) -> &BTreeSet<u32> {
        &self.fired
    }

    /// Apply a delta, clamping at zero. Returns the milestone it unlocked, if any.
    pub fn apply(&mut self, delta: i32) -> Option<&'static MilestoneDef> {
        self.score = self.score.saturating_add_signed(delta);
        self.check_milestones()
    }

    /// Fire at most one milestone: the lowest unfired one already reached
    fn check_milestones(&mut self) -> Option<&'static MilestoneDef> {
        let milestone = MILESTONES
            .iter()
            .find(|m| self.score >= m.threshold && !self.fired.contains(&m.threshold))?;
        self.fired.insert(milestone.threshold);
        Some(milestone)
    }

    /// Back to zero with no milestones fired
    pub fn clear(&mut self) {
        self.score = 0;
        self.fired.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_score_clamps_at_zero() {
        let mut board = Scoreboard::new();
        board.apply(1);
        board.apply(-2);
        assert_eq!(board.score(), 0);
        board.apply(-2);
        assert_eq!(board.score(), 0);
    }

    #[test]
    fn test_milestone_fires_once() {
        let mut board = Scoreboard::new();
        for _ in 0..4 {
            assert!(board.apply(1).is_none());
        }
        let milestone = board.apply(1).expect("5 points reached");
        assert_eq!(milestone.threshold, 5);

        // Dip below and climb back: no repeat
        board.apply(-2);
        assert!(board.apply(1).is_none());
        assert!(board.apply(1).is_none());
        assert_eq!(board.score(), 5);
    }

    #[test]
    fn test_one_milestone_per_change() {
        let mut board = Scoreboard::new();
        // A jump past two thresholds only announces the lower one
        assert_eq!(board.apply(12).map(|m| m.threshold), Some(5));
        assert_eq!(board.apply(0).map(|m| m.threshold), Some(10));
        assert!(board.apply(0).is_none());
    }

    #[test]
    fn test_clear_rearms_milestones() {
        let mut board = Scoreboard::new();
        board.apply(5);
        assert!(board.fired_milestones().contains(&5));
        board.clear();
        assert_eq!(board.score(), 0);
        assert!(board.fired_milestones().is_empty());
        assert!(board.apply(5).is_some());
    }

    #[test]
    fn test_milestones_ascending() {
        assert!(MILESTONES.windows(2).all(|w| w[0].threshold < w[1].threshold));
    }

    proptest! {
        #[test]
        fn prop_milestones_fire_once_and_only_when_reached(
            deltas in prop::collection::vec(prop_oneof![Just(1i32), Just(-2i32), Just(-1i32)], 0..200)
        ) {
            let mut board = Scoreboard::new();
            let mut seen = BTreeSet::new();
            for delta in deltas {
                if let Some(m) = board.apply(delta) {
                    prop_assert!(board.score() >= m.threshold);
                    prop_assert!(seen.insert(m.threshold));
                }
            }
        }
    }
}
