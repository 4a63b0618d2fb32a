//! Outbound notifications for the presentation layer
//!
//! The round queues these as it changes; the shell drains and renders them.

use serde::Serialize;

use super::profile::{Difficulty, RoundConfig};
use super::ramp::Knobs;
use super::spawner::{DropId, DropKind, WaterDrop};

/// How a round finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Won,
    Lost,
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// A round began (fresh or via reset); clear messages and effects
    RoundStarted {
        difficulty: Difficulty,
        config: RoundConfig,
    },
    ScoreChanged { score: u32 },
    TimeChanged { seconds_left: u32 },
    /// Render and start animating a new drop
    DropCreated { drop: WaterDrop },
    /// Remove every rendered drop
    DropsCleared,
    /// A good drop fell out uncaught
    DropMissed { id: DropId },
    /// Flash/shake/sound cue for a catch
    CatchFeedback { kind: DropKind },
    Milestone { message: &'static str },
    DifficultyRamped { knobs: Knobs },
    RoundEnded { outcome: Outcome, final_score: u32 },
    /// Win effect (confetti, fanfare)
    Celebrate,
}
